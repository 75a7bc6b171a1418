#![allow(dead_code)]

pub mod log_capture {
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink usable as a dispatcher log port
    #[derive(Clone, Default)]
    pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

    impl LogCapture {
        pub fn new() -> Self {
            Self::default()
        }

        /// Everything written so far
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }

        /// Parse each captured line as a JSON event
        pub fn events(&self) -> Vec<serde_json::Value> {
            self.contents()
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| serde_json::from_str(l).expect("json log line"))
                .collect()
        }

        /// Events whose message equals `message`
        pub fn events_with_message(&self, message: &str) -> Vec<serde_json::Value> {
            self.events()
                .into_iter()
                .filter(|e| e["fields"]["message"] == message)
                .collect()
        }
    }

    impl io::Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = LogCapture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }
}

pub mod handlers {
    use lux::gateway::{Request, ResponseSink};

    /// Handler that answers with a fixed status and text body
    pub fn text(status: u16, body: &'static str) -> impl Fn(&mut ResponseSink, &Request) + Send + Sync {
        move |w: &mut ResponseSink, _req: &Request| {
            w.set_status(status);
            w.write_bytes(body.as_bytes());
        }
    }
}
