//! Deterministic loader and timer doubles for the unit tests.

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::Duration,
};

use crate::{
    error::LoadFailure,
    fallback::Timer,
    probe::{ImageLoader, ProbeCompletion},
    release::Release,
    status::LoadingStatus,
    store::{StatusStore, Subscription},
};

pub(crate) fn history(store: &StatusStore) -> (Rc<RefCell<Vec<LoadingStatus>>>, Subscription) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let subscription = store.subscribe({
        let seen = seen.clone();
        move |status| seen.borrow_mut().push(status)
    });
    (seen, subscription)
}

struct PendingLoad {
    completion: ProbeCompletion,
    released: Rc<Cell<bool>>,
}

/// Records every load; tests resolve them by source.
#[derive(Clone, Default)]
pub(crate) struct ManualLoader {
    loads: Rc<RefCell<Vec<PendingLoad>>>,
    immediate: Option<Result<(), LoadFailure>>,
}

impl ManualLoader {
    pub(crate) fn resolving_immediately(outcome: Result<(), LoadFailure>) -> Self {
        Self {
            immediate: Some(outcome),
            ..Self::default()
        }
    }

    pub(crate) fn load_count(&self) -> usize {
        self.loads.borrow().len()
    }

    pub(crate) fn live_resources(&self) -> usize {
        self.loads
            .borrow()
            .iter()
            .filter(|load| !load.released.get())
            .count()
    }

    pub(crate) fn is_released(&self, src: &str) -> bool {
        self.loads
            .borrow()
            .iter()
            .filter(|load| load.completion.src() == src)
            .all(|load| load.released.get())
    }

    /// Resolves every load recorded for `src`.
    pub(crate) fn resolve(&self, src: &str, outcome: Result<(), LoadFailure>) {
        let completions: Vec<ProbeCompletion> = self
            .loads
            .borrow()
            .iter()
            .filter(|load| load.completion.src() == src)
            .map(|load| load.completion.clone())
            .collect();

        for completion in completions {
            completion.resolve(outcome.clone());
        }
    }
}

impl ImageLoader for ManualLoader {
    fn load(&self, _src: &str, completion: ProbeCompletion) -> Release {
        let released = Rc::new(Cell::new(false));
        self.loads.borrow_mut().push(PendingLoad {
            completion: completion.clone(),
            released: released.clone(),
        });

        if let Some(outcome) = &self.immediate {
            completion.resolve(outcome.clone());
        }

        Release::new(move || released.set(true))
    }
}

struct ScheduledTask {
    id: u64,
    due: Duration,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct TimerInner {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    tasks: RefCell<Vec<ScheduledTask>>,
}

/// Virtual clock; tasks fire only when the test advances time.
#[derive(Clone, Default)]
pub(crate) struct ManualTimer(Rc<TimerInner>);

impl ManualTimer {
    pub(crate) fn pending(&self) -> usize {
        self.0.tasks.borrow().len()
    }

    pub(crate) fn advance(&self, by: Duration) {
        let now = self.0.now.get() + by;
        self.0.now.set(now);

        let due: Vec<ScheduledTask> = {
            let mut tasks = self.0.tasks.borrow_mut();
            let (due, waiting): (Vec<ScheduledTask>, Vec<ScheduledTask>) = std::mem::take(&mut *tasks)
                .into_iter()
                .partition(|task| task.due <= now);
            *tasks = waiting;
            due
        };

        for scheduled in due {
            (scheduled.task)();
        }
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, after: Duration, task: Box<dyn FnOnce()>) -> Release {
        let id = self.0.next_id.get();
        self.0.next_id.set(id + 1);
        self.0.tasks.borrow_mut().push(ScheduledTask {
            id,
            due: self.0.now.get() + after,
            task,
        });

        let inner = Rc::downgrade(&self.0);
        Release::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.tasks.borrow_mut().retain(|task| task.id != id);
            }
        })
    }
}
