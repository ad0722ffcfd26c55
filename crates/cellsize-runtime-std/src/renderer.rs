//! A renderer that measures on a dedicated worker thread.

use std::fmt;
use std::future::Future;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};
use std::thread::{self, JoinHandle};

use cellsize_core::{AsyncRenderer, RenderError, RenderFuture, RenderRequest};

type Measure = Arc<dyn Fn(&RenderRequest) -> Result<f32, RenderError> + Send + Sync>;
type TaskQueue = Arc<Mutex<Receiver<RenderTask>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct RenderSlot {
    result: Option<Result<f32, RenderError>>,
    waker: Option<Waker>,
    answered: bool,
    cancelled: bool,
}

type SharedSlot = Arc<Mutex<RenderSlot>>;

/// Stores the first answer for a request and wakes whoever polled last.
fn deliver(slot: &SharedSlot, result: Result<f32, RenderError>) {
    let waker = {
        let mut slot = lock(slot);
        if slot.cancelled || slot.answered {
            return;
        }
        slot.answered = true;
        slot.result = Some(result);
        slot.waker.take()
    };
    if let Some(waker) = waker {
        waker.wake();
    }
}

/// One request travelling to a worker.
///
/// A task dropped without an answer (the renderer shut down first) resolves
/// its future with [`RenderError::Disconnected`].
struct RenderTask {
    request: RenderRequest,
    slot: SharedSlot,
}

impl Drop for RenderTask {
    fn drop(&mut self) {
        deliver(&self.slot, Err(RenderError::Disconnected));
    }
}

#[derive(Default)]
struct WorkerState {
    /// Slot of the request inside `measure` right now.
    current: Option<SharedSlot>,
    /// Set once the worker must stop taking requests.
    retired: bool,
}

impl WorkerState {
    /// Inside `measure` for a request that has no answer yet.
    fn is_measuring(&self) -> bool {
        self.current.as_ref().is_some_and(|slot| !lock(slot).answered)
    }

    /// Inside `measure` for a request nobody waits for any more.
    fn is_stuck(&self) -> bool {
        self.current.as_ref().is_some_and(|slot| {
            let slot = lock(slot);
            slot.cancelled && !slot.answered
        })
    }
}

struct Worker {
    generation: usize,
    state: Arc<Mutex<WorkerState>>,
    handle: JoinHandle<()>,
}

impl Worker {
    fn spawn(generation: usize, tasks: &TaskQueue, measure: &Measure) -> io::Result<Self> {
        let state = Arc::new(Mutex::new(WorkerState::default()));
        let handle = thread::Builder::new()
            .name(format!("cellsize-render-{generation}"))
            .spawn({
                let state = Arc::clone(&state);
                let tasks = Arc::clone(tasks);
                let measure = Arc::clone(measure);
                move || run_worker(&state, &tasks, &measure)
            })?;
        Ok(Self {
            generation,
            state,
            handle,
        })
    }

    /// Retires the worker when it is measuring a request nobody waits for.
    ///
    /// Checked and set under one lock so the worker cannot slip back to the
    /// task queue in between.
    fn retire_if_stuck(&self) -> bool {
        let mut state = lock(&self.state);
        let stuck = state.is_stuck();
        if stuck {
            state.retired = true;
        }
        stuck
    }

    /// Retires the worker, joining it when idle and detaching it otherwise.
    /// An idle worker only exits once every sender is gone.
    fn shut_down(self) {
        let busy = {
            let mut state = lock(&self.state);
            state.retired = true;
            state.is_measuring()
        };
        if busy && !self.handle.is_finished() {
            log::warn!(
                "render worker {} is still measuring, leaving it behind",
                self.generation
            );
            return;
        }
        if self.handle.join().is_err() {
            log::error!("render worker {} panicked", self.generation);
        }
    }
}

fn run_worker(state: &Mutex<WorkerState>, tasks: &Mutex<Receiver<RenderTask>>, measure: &Measure) {
    loop {
        let Ok(task) = lock(tasks).recv() else {
            break;
        };
        {
            let mut state = lock(state);
            if state.retired {
                break;
            }
            if lock(&task.slot).cancelled {
                log::trace!("skipping cancelled render for {}", task.request.item);
                continue;
            }
            state.current = Some(Arc::clone(&task.slot));
        }

        let result = match panic::catch_unwind(AssertUnwindSafe(|| measure(&task.request))) {
            Ok(result) => result,
            Err(_) => {
                log::error!("measure function panicked for {}", task.request.item);
                Err(RenderError::Disconnected)
            }
        };
        deliver(&task.slot, result);

        let mut state = lock(state);
        state.current = None;
        if state.retired {
            break;
        }
    }
    log::debug!("render worker shutting down");
}

/// Runs a measuring function on a worker thread.
///
/// Each request is answered exactly once through the returned future.
/// Dropping the future before it resolves cancels the request; the worker
/// skips it if it has not started yet and discards the answer otherwise.
///
/// A worker still inside `measure` for a cancelled request is replaced before
/// the next request is sent, so one stalled measurement does not hold up the
/// ones behind it. The stalled thread is left to finish on its own.
pub struct ThreadRenderer {
    sender: Option<Sender<RenderTask>>,
    tasks: TaskQueue,
    measure: Measure,
    worker: Option<Worker>,
    generation: usize,
}

impl ThreadRenderer {
    pub fn spawn<F>(measure: F) -> io::Result<Self>
    where
        F: Fn(&RenderRequest) -> Result<f32, RenderError> + Send + Sync + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let tasks: TaskQueue = Arc::new(Mutex::new(receiver));
        let measure: Measure = Arc::new(measure);
        let worker = Worker::spawn(0, &tasks, &measure)?;
        Ok(Self {
            sender: Some(sender),
            tasks,
            measure,
            worker: Some(worker),
            generation: 0,
        })
    }

    /// Workers started so far, the first one included.
    pub fn workers_started(&self) -> usize {
        self.generation + 1
    }

    fn replace_stuck_worker(&mut self) {
        let Some(worker) = &self.worker else {
            return;
        };
        if !worker.handle.is_finished() && !worker.retire_if_stuck() {
            return;
        }
        let generation = self.generation + 1;
        match Worker::spawn(generation, &self.tasks, &self.measure) {
            Ok(replacement) => {
                self.generation = generation;
                if let Some(stuck) = self.worker.replace(replacement) {
                    log::warn!(
                        "render worker {} stalled or exited, started worker {}",
                        stuck.generation,
                        generation
                    );
                    stuck.shut_down();
                }
            }
            Err(err) => {
                log::error!("could not replace stalled render worker: {err}");
                if let Some(worker) = &self.worker {
                    lock(&worker.state).retired = false;
                }
            }
        }
    }
}

impl AsyncRenderer for ThreadRenderer {
    fn render(&mut self, request: RenderRequest) -> RenderFuture {
        self.replace_stuck_worker();

        let slot = SharedSlot::default();
        let future = ThreadRenderFuture {
            slot: Arc::clone(&slot),
        };
        let task = RenderTask { request, slot };
        match &self.sender {
            Some(sender) => {
                if let Err(mpsc::SendError(task)) = sender.send(task) {
                    log::warn!("render worker is gone, request for {} dropped", task.request.item);
                }
            }
            None => drop(task),
        }
        Box::pin(future)
    }
}

impl Drop for ThreadRenderer {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            worker.shut_down();
        }
    }
}

impl fmt::Debug for ThreadRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadRenderer")
            .field("running", &self.sender.is_some())
            .field("workers_started", &self.workers_started())
            .finish()
    }
}

struct ThreadRenderFuture {
    slot: SharedSlot,
}

impl Future for ThreadRenderFuture {
    type Output = Result<f32, RenderError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = lock(&self.slot);
        match slot.result.take() {
            Some(result) => Poll::Ready(result),
            None => {
                let waker = cx.waker();
                if !slot.waker.as_ref().is_some_and(|stored| stored.will_wake(waker)) {
                    slot.waker = Some(waker.clone());
                }
                Poll::Pending
            }
        }
    }
}

impl Drop for ThreadRenderFuture {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        slot.cancelled = true;
        slot.waker = None;
    }
}

#[cfg(test)]
#[path = "tests/thread_renderer_tests.rs"]
mod tests;
