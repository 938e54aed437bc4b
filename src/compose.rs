use crate::prop_bag::PropValue;
use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

type HandlerFn = dyn Fn(&[PropValue]) -> Result<()> + Send + Sync;

/// A shared event handler receiving the event's argument list
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Creates a handler that may fail
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[PropValue]) -> Result<()> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Creates a handler from a closure that cannot fail
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[PropValue]) + Send + Sync + 'static,
    {
        Self::new(move |args| {
            f(args);
            Ok(())
        })
    }

    /// Invokes the handler with the given arguments
    pub fn call(&self, args: &[PropValue]) -> Result<()> {
        (self.0)(args)
    }

    /// Returns true if both handles point at the same closure
    pub fn ptr_eq(&self, other: &Handler) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// Combines handlers into one that invokes each present handler in order.
///
/// Every handler is invoked even when an earlier one fails. Failures are
/// logged and the first one is returned once the whole sequence has run.
/// Panics are not caught.
pub fn call_all<I>(handlers: I) -> Handler
where
    I: IntoIterator<Item = Option<Handler>>,
{
    let handlers: Vec<Handler> = handlers.into_iter().flatten().collect();
    debug!("Composing {} handler(s)", handlers.len());

    Handler::new(move |args| {
        let mut first_error = None;
        for (index, handler) in handlers.iter().enumerate() {
            if let Err(e) = handler.call(args) {
                warn!("Handler {} of {} failed: {:#}", index + 1, handlers.len(), e);
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })
}

/// Like [`call_all`], but takes raw property values and skips anything
/// that is not callable
pub fn call_all_values<I>(values: I) -> Handler
where
    I: IntoIterator<Item = PropValue>,
{
    call_all(values.into_iter().map(|value| match value {
        PropValue::Handler(handler) => Some(handler),
        PropValue::Null => None,
        other => {
            debug!("Skipping non-callable value in handler list: {}", other);
            None
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::Mutex;

    fn recorder(log: &Arc<Mutex<Vec<String>>>, label: &'static str) -> Handler {
        let log = Arc::clone(log);
        Handler::from_fn(move |args| {
            log.lock().unwrap().push(format!("{}:{}", label, args.len()));
        })
    }

    #[test]
    fn test_call_all_runs_in_order_with_same_args() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = call_all([Some(recorder(&log, "a")), Some(recorder(&log, "b"))]);

        composed.call(&[PropValue::from(1.0), PropValue::from("x")]).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["a:2", "b:2"]);
    }

    #[test]
    fn test_call_all_skips_absent_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = call_all([None, Some(recorder(&log, "only")), None]);

        composed.call(&[]).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["only:0"]);
    }

    #[test]
    fn test_call_all_empty_is_noop() {
        let composed = call_all(Vec::<Option<Handler>>::new());
        assert!(composed.call(&[]).is_ok());
    }

    #[test]
    fn test_call_all_values_skips_non_callables() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = call_all_values([
            PropValue::Null,
            PropValue::Str("not a function".to_string()),
            PropValue::Bool(true),
            PropValue::Handler(recorder(&log, "h")),
        ]);

        composed.call(&[]).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["h:0"]);
    }

    #[test]
    fn test_call_all_continues_after_failure_and_returns_first_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let composed = call_all([
            Some(Handler::new(|_| Err(anyhow!("first")))),
            Some(recorder(&log, "after")),
            Some(Handler::new(|_| Err(anyhow!("second")))),
        ]);

        let err = composed.call(&[]).unwrap_err();

        assert_eq!(err.to_string(), "first");
        assert_eq!(*log.lock().unwrap(), vec!["after:0"]);
    }

    #[test]
    fn test_handler_ptr_eq() {
        let a = Handler::from_fn(|_| {});
        let b = a.clone();
        let c = Handler::from_fn(|_| {});
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
