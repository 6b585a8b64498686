//! Prometheus request middleware that can be switched off at startup.
//!
//! Both branches box the wrapped service so the app type does not depend on
//! whether a registry was configured.

use std::sync::Arc;

use actix_service::{
    Service, ServiceExt as _, Transform,
    boxed::{self, BoxService},
};
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Compat;
use actix_web_prom::PrometheusMetrics;
use futures_util::future::LocalBoxFuture;

type BoxedService = BoxService<ServiceRequest, ServiceResponse<BoxBody>, actix_web::Error>;

/// Request metrics layer; passes requests through untouched when empty.
#[derive(Clone, Default)]
pub(crate) struct MetricsLayer(Option<Arc<PrometheusMetrics>>);

impl From<Option<PrometheusMetrics>> for MetricsLayer {
    fn from(metrics: Option<PrometheusMetrics>) -> Self {
        Self(metrics.map(Arc::new))
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsLayer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = BoxedService;
    type Future = LocalBoxFuture<'static, Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        let Some(metrics) = self.0.clone() else {
            let passthrough = service.map(|res: ServiceResponse<B>| res.map_into_boxed_body());
            return Box::pin(async move { Ok(boxed::service(passthrough)) });
        };
        let pending = Compat::new((*metrics).clone()).new_transform(service);
        Box::pin(async move { Ok(boxed::service(pending.await?)) })
    }
}
