//! Template lookup (`templates?email=`).

use std::sync::Arc;

use super::JsonResponse;
use crate::settings::HarnessSettings;
use crate::transport::{ApiRequest, Method, Transport, TransportError};

const TEMPLATES_PATH: &str = "templates";

pub struct TemplatesApi {
    transport: Arc<dyn Transport>,
    base_url: String,
}

impl TemplatesApi {
    pub fn new(transport: Arc<dyn Transport>, settings: &HarnessSettings) -> Self {
        Self {
            transport,
            base_url: settings.template_base_url.clone(),
        }
    }

    /// Send `method` to the templates endpoint for `email`. Only GET is
    /// supported by the service; other verbs exist so scenarios can assert the
    /// 405 answers.
    pub async fn template_request(
        &self,
        method: Method,
        email: &str,
        token: &str,
    ) -> Result<JsonResponse, TransportError> {
        let request = ApiRequest::new(method, &self.base_url, TEMPLATES_PATH)
            .query(&[("email", email)])
            .bearer(token);
        let response = self.transport.send(request).await?;
        Ok(JsonResponse::lenient(&response))
    }
}
