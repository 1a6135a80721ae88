//! Model lifecycle callbacks.
//!
//! Observers are notified around model creation: once before a build
//! starts and once after it finishes, in registration order. Creations
//! served from the cache fire no callbacks.

use std::sync::Arc;

use parking_lot::RwLock;

pub trait LifecycleCallback: Send + Sync {
    fn on_before_model_created(&self) {}
    fn on_after_model_created(&self) {}
}

#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: RwLock<Vec<Arc<dyn LifecycleCallback>>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, callback: Arc<dyn LifecycleCallback>) {
        self.callbacks.write().push(callback);
    }

    pub fn on_before_model_created(&self) {
        for cb in self.callbacks.read().iter() {
            cb.on_before_model_created();
        }
    }

    pub fn on_after_model_created(&self) {
        for cb in self.callbacks.read().iter() {
            cb.on_after_model_created();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    struct Recorder {
        tag: &'static str,
        trace: Arc<Mutex<Vec<String>>>,
    }

    impl LifecycleCallback for Recorder {
        fn on_before_model_created(&self) {
            self.trace.lock().unwrap().push(format!("before:{}", self.tag));
        }

        fn on_after_model_created(&self) {
            self.trace.lock().unwrap().push(format!("after:{}", self.tag));
        }
    }

    #[test]
    fn callbacks_fire_in_registration_order() {
        let trace = Arc::new(Mutex::new(Vec::new()));
        let registry = CallbackRegistry::new();
        registry.register(Arc::new(Recorder { tag: "a", trace: Arc::clone(&trace) }));
        registry.register(Arc::new(Recorder { tag: "b", trace: Arc::clone(&trace) }));

        registry.on_before_model_created();
        registry.on_after_model_created();

        assert_eq!(
            *trace.lock().unwrap(),
            vec!["before:a", "before:b", "after:a", "after:b"]
        );
    }

    #[test]
    fn empty_registry_is_a_no_op() {
        let registry = CallbackRegistry::new();
        registry.on_before_model_created();
        registry.on_after_model_created();
    }

    #[test]
    fn default_methods_do_nothing() {
        struct Silent;
        impl LifecycleCallback for Silent {}

        let registry = CallbackRegistry::new();
        registry.register(Arc::new(Silent));
        registry.on_before_model_created();
        registry.on_after_model_created();
    }
}
