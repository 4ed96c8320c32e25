use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;

/// Callback invoked from the worker once a result is ready, typically to
/// request a repaint of the UI.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, PartialEq, Eq)]
pub enum Poll<T> {
    Ready(T),
    Waiting,
    /// The worker went away without producing a result.
    Lost,
}

/// Handle to a one-shot background job.
pub struct Pending<T> {
    rx: Receiver<T>,
}

impl<T> Pending<T> {
    pub fn try_take(&self) -> Poll<T> {
        match self.rx.try_recv() {
            Ok(value) => Poll::Ready(value),
            Err(TryRecvError::Empty) => Poll::Waiting,
            Err(TryRecvError::Disconnected) => Poll::Lost,
        }
    }

    /// Block until the job finishes. Returns `None` if the worker died.
    pub fn wait(self) -> Option<T> {
        self.rx.recv().ok()
    }
}

/// Run `job` on a named worker thread and hand back a handle to its result.
pub fn spawn<T, F>(name: &str, waker: Option<Waker>, job: F) -> Pending<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = channel();
    let run = move || {
        // The receiver may already be gone when the result was superseded.
        let _ = tx.send(job());
        if let Some(wake) = waker {
            wake();
        }
    };
    if let Err(e) = std::thread::Builder::new().name(name.into()).spawn(run) {
        tracing::error!("failed to spawn {name} worker: {e}");
    }
    Pending { rx }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn result_arrives_and_waker_fires() {
        let woke = Arc::new(AtomicBool::new(false));
        let flag = woke.clone();
        let pending = spawn("test", Some(Arc::new(move || flag.store(true, Ordering::SeqCst))), || 7);
        assert_eq!(pending.wait(), Some(7));
        // The waker runs right after the send.
        for _ in 0..100 {
            if woke.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
        assert!(woke.load(Ordering::SeqCst));
    }

    #[test]
    fn panicking_job_is_lost() {
        let pending: Pending<u8> = spawn("test", None, || panic!("boom"));
        let mut outcome = pending.try_take();
        for _ in 0..200 {
            if outcome != Poll::Waiting {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
            outcome = pending.try_take();
        }
        assert_eq!(outcome, Poll::Lost);
    }
}
