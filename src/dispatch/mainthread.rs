use crate::base::error::CookieError;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};
use tokio::sync::{mpsc, oneshot};

/// Work item executed on the main context.
pub type Job = Box<dyn FnOnce(&MainContext) + Send + 'static>;

/// Handle to a dedicated single-threaded execution context.
///
/// Jobs run one at a time in submission order on a named OS thread. APIs that are
/// only safe on that thread take a [`MainContext`], which exists only while a job
/// is running there.
#[derive(Clone)]
pub struct MainThread {
    inner: Arc<Inner>,
}

struct Inner {
    queue: mpsc::UnboundedSender<Job>,
    thread_id: ThreadId,
}

/// Proof that code is running on the main context.
///
/// Not `Send`: it cannot escape the thread it was created on.
pub struct MainContext {
    queue: mpsc::WeakUnboundedSender<Job>,
    _not_send: PhantomData<*const ()>,
}

static SHARED: OnceLock<Option<MainThread>> = OnceLock::new();

impl MainThread {
    /// Start a new main context on its own thread.
    ///
    /// The thread exits once every `MainThread` handle is dropped and the queue
    /// drains.
    pub fn spawn(name: &str) -> std::io::Result<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
        let weak = tx.downgrade();

        let handle = thread::Builder::new().name(name.to_string()).spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                let cx = MainContext {
                    queue: weak.clone(),
                    _not_send: PhantomData,
                };
                job(&cx);
            }
            tracing::debug!("main context queue closed");
        })?;

        Ok(Self {
            inner: Arc::new(Inner {
                queue: tx,
                thread_id: handle.thread().id(),
            }),
        })
    }

    /// The process-wide main context, started on first use.
    ///
    /// `None` if the thread could not be spawned.
    pub fn shared() -> Option<MainThread> {
        SHARED
            .get_or_init(|| match MainThread::spawn("keet-main") {
                Ok(main) => Some(main),
                Err(e) => {
                    tracing::error!(error = %e, "failed to start main context");
                    None
                }
            })
            .clone()
    }

    /// True when called from this context's thread.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.inner.thread_id
    }

    /// Queue `job` without waiting for it.
    pub fn dispatch<F>(&self, job: F) -> Result<(), CookieError>
    where
        F: FnOnce(&MainContext) + Send + 'static,
    {
        self.inner
            .queue
            .send(Box::new(job))
            .map_err(|_| CookieError::unsupported("The main context is no longer running."))
    }

    /// Run `f` on the main context and wait for the value it sends back.
    ///
    /// `f` receives the reply channel so it can answer from a later callback
    /// rather than before returning.
    pub async fn run<T, F>(&self, f: F) -> Result<T, CookieError>
    where
        T: Send + 'static,
        F: FnOnce(&MainContext, oneshot::Sender<T>) + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.dispatch(move |cx| f(cx, tx))?;
        rx.await
            .map_err(|_| CookieError::unsupported("The main context dropped the request."))
    }
}

impl MainContext {
    /// Queue a follow-up job behind everything already waiting.
    pub fn post<F>(&self, job: F)
    where
        F: FnOnce(&MainContext) + Send + 'static,
    {
        match self.queue.upgrade() {
            Some(queue) => {
                if queue.send(Box::new(job)).is_err() {
                    tracing::warn!("main context closed before a posted job could run");
                }
            }
            None => tracing::warn!("main context closed before a posted job could run"),
        }
    }
}
