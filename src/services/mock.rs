// Doble de Api para tests: respuestas programadas en cola, con soporte
// para diferir una respuesta y controlar el orden de resolución.

use std::cell::RefCell;
use std::collections::VecDeque;

use futures::channel::oneshot;
use serde::de::DeserializeOwned;

use crate::services::api::{Api, ApiError, RequestOptions};

pub(crate) enum Planned {
    Ready(Result<serde_json::Value, ApiError>),
    Deferred(oneshot::Receiver<Result<serde_json::Value, ApiError>>),
}

pub(crate) struct MockApi {
    pub calls: RefCell<Vec<(String, RequestOptions)>>,
    responses: RefCell<VecDeque<Planned>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            responses: RefCell::new(VecDeque::new()),
        }
    }

    pub fn push_ok(&self, value: serde_json::Value) {
        self.responses
            .borrow_mut()
            .push_back(Planned::Ready(Ok(value)));
    }

    pub fn push_err(&self, error: ApiError) {
        self.responses
            .borrow_mut()
            .push_back(Planned::Ready(Err(error)));
    }

    /// Programa una respuesta diferida; el test decide cuándo y con qué
    /// resolverla a través del sender devuelto
    pub fn push_deferred(&self) -> oneshot::Sender<Result<serde_json::Value, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .borrow_mut()
            .push_back(Planned::Deferred(rx));
        tx
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn last_call(&self) -> (String, RequestOptions) {
        self.calls
            .borrow()
            .last()
            .cloned()
            .expect("no se registró ningún request")
    }
}

impl Api for MockApi {
    async fn execute<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        self.calls
            .borrow_mut()
            .push((endpoint.to_string(), options));

        let planned = self
            .responses
            .borrow_mut()
            .pop_front()
            .expect("request sin respuesta programada");

        let value = match planned {
            Planned::Ready(result) => result?,
            Planned::Deferred(rx) => rx.await.expect("respuesta diferida cancelada")?,
        };

        serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))
    }
}
