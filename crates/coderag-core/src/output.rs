//! Response sink: where generated text ends up.
//!
//! Core logic only names relative paths; the infra layer decides what a
//! path means (Markdown files under an output root).

use std::io;

/// Destination for generated responses and review artifacts.
pub trait ResponseSink: Send + Sync {
    /// Write `content` to `relative_path`, replacing anything already there.
    fn write(
        &self,
        relative_path: &str,
        content: &str,
    ) -> impl std::future::Future<Output = io::Result<()>> + Send;
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// Collects writes in memory, keyed by path.
    #[derive(Default)]
    pub struct MemorySink {
        files: Mutex<BTreeMap<String, String>>,
    }

    impl MemorySink {
        pub fn get(&self, path: &str) -> Option<String> {
            self.files.lock().unwrap().get(path).cloned()
        }

        pub fn paths(&self) -> Vec<String> {
            self.files.lock().unwrap().keys().cloned().collect()
        }
    }

    impl ResponseSink for MemorySink {
        async fn write(&self, relative_path: &str, content: &str) -> io::Result<()> {
            self.files
                .lock()
                .unwrap()
                .insert(relative_path.to_string(), content.to_string());
            Ok(())
        }
    }
}
