// Validation pipe for automatic request validation

use crate::{Bind, FieldBinder, Validate, ValidationOutcome, ValidationProblemDetails};
use std::future::Future;
use std::sync::Arc;
use verity_core::{Error, HandlerFn, HandlerFuture, HttpRequest, HttpResponse};

/// Result of binding and validating one request
#[derive(Debug)]
pub enum Verdict<M> {
    /// Every rule passed; the handler runs with the bound model
    Accepted(M),
    /// At least one rule failed; the handler never runs
    Rejected(ValidationOutcome),
}

impl<M> Verdict<M> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted(_))
    }

    pub fn into_result(self) -> Result<M, ValidationOutcome> {
        match self {
            Verdict::Accepted(model) => Ok(model),
            Verdict::Rejected(outcome) => Err(outcome),
        }
    }
}

/// Binds request models and turns failures into problem responses
pub struct ValidationPipe;

impl ValidationPipe {
    /// Bind `M` from the JSON body and validate it
    pub fn body<M: Bind + Validate>(req: &HttpRequest) -> Verdict<M> {
        match FieldBinder::parse_body(&req.body) {
            Ok(object) => Self::check(FieldBinder::json(&object)),
            Err(error) => Verdict::Rejected(error.into()),
        }
    }

    /// Bind `M` from the query string and validate it
    pub fn query<M: Bind + Validate>(req: &HttpRequest) -> Verdict<M> {
        Self::check(FieldBinder::query(&req.query_params))
    }

    fn check<M: Bind + Validate>(mut binder: FieldBinder<'_>) -> Verdict<M> {
        let model = M::bind(&mut binder);
        let outcome = M::schema().validate_with(&model, binder.into_outcome());
        if outcome.is_valid() {
            Verdict::Accepted(model)
        } else {
            Verdict::Rejected(outcome)
        }
    }

    /// `400` problem response for a rejected request
    pub fn error_response(
        outcome: &ValidationOutcome,
        trace_id: &str,
    ) -> Result<HttpResponse, Error> {
        ValidationProblemDetails::new(outcome, trace_id).into_response()
    }

    /// Run `handler` for an accepted verdict, answer `400` otherwise
    pub async fn run<M, F, Fut>(
        verdict: Verdict<M>,
        req: &HttpRequest,
        handler: F,
    ) -> Result<HttpResponse, Error>
    where
        F: FnOnce(M) -> Fut,
        Fut: Future<Output = Result<HttpResponse, Error>>,
    {
        match verdict {
            Verdict::Accepted(model) => handler(model).await,
            Verdict::Rejected(outcome) => {
                verity_log::debug!(
                    target: "verity::validation",
                    "{} {} rejected ({}): {}",
                    req.method,
                    req.path,
                    req.trace_id(),
                    outcome.fields().join(", ")
                );
                Self::error_response(&outcome, req.trace_id())
            }
        }
    }
}

/// Handler that binds `M` from the JSON body before calling `handler`
pub fn validated_body<M, F, Fut>(handler: F) -> HandlerFn
where
    M: Bind + Validate + Send,
    F: Fn(M) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |req: HttpRequest| -> HandlerFuture {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            let verdict = ValidationPipe::body::<M>(&req);
            ValidationPipe::run(verdict, &req, |model| handler(model)).await
        })
    })
}

/// Handler that binds `M` from the query string before calling `handler`
pub fn validated_query<M, F, Fut>(handler: F) -> HandlerFn
where
    M: Bind + Validate + Send,
    F: Fn(M) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<HttpResponse, Error>> + Send + 'static,
{
    let handler = Arc::new(handler);
    Arc::new(move |req: HttpRequest| -> HandlerFuture {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            let verdict = ValidationPipe::query::<M>(&req);
            ValidationPipe::run(verdict, &req, |model| handler(model)).await
        })
    })
}
