//! The connectivity worker: one action, one transition, per step
//!
//! [`ConnectivityManager`] owns every collaborator and the live session.
//! Each [`step`](ConnectivityManager::step) runs the current state's action
//! (which may block on a collaborator or on the idle wait), samples the
//! guard inputs, and moves to the next state. [`run`](ConnectivityManager::run)
//! repeats that until the machine halts.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_io::Error as _;
use hal_abstractions::{NetworkProvider, PowerHintSink, SessionProvider, TimeSyncProvider};

use super::config::ConnectivityConfig;
use super::error::{Fault, Halted};
use super::power::PowerHintCoordinator;
use super::shared::Connectivity;
use super::state::{transition, State, TransitionInputs};
use crate::fmt::Debug2Format;
use crate::telemetry::TelemetryBatch;

/// Collaborators the manager drives
pub struct Providers<N, T, S, P> {
    pub network: N,
    pub time: T,
    pub session: S,
    pub power: P,
}

/// Connectivity/session state machine
///
/// Construct once per boot and drive it from a dedicated task:
///
/// ```ignore
/// #[task(priority = 1)]
/// async fn uplink_task(_cx: uplink_task::Context, providers: BoardProviders) -> ! {
///     let mut manager =
///         ConnectivityManager::new(&UPLINK, providers, ConnectivityConfig::default());
///     let halted = manager.run().await;
///     error!("{}", halted);
///     core::future::pending().await
/// }
/// ```
pub struct ConnectivityManager<'a, M, N, T, S, P, const C: usize>
where
    M: RawMutex,
    S: SessionProvider<TelemetryBatch>,
{
    shared: &'a Connectivity<M, C>,
    network: N,
    time: T,
    sessions: S,
    power: PowerHintCoordinator<P>,
    config: ConnectivityConfig,
    state: State,
    time_sync_required: bool,
    session: Option<S::Session>,
    consecutive_retries: u32,
}

impl<'a, M, N, T, S, P, const C: usize> ConnectivityManager<'a, M, N, T, S, P, C>
where
    M: RawMutex,
    N: NetworkProvider,
    T: TimeSyncProvider,
    S: SessionProvider<TelemetryBatch>,
    P: PowerHintSink,
{
    pub fn new(
        shared: &'a Connectivity<M, C>,
        providers: Providers<N, T, S, P>,
        config: ConnectivityConfig,
    ) -> Self {
        shared.status().set_state(State::Start);
        Self {
            shared,
            network: providers.network,
            time: providers.time,
            sessions: providers.session,
            power: PowerHintCoordinator::new(providers.power),
            config,
            state: State::Start,
            time_sync_required: config.sync_time_on_boot,
            session: None,
            consecutive_retries: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// A session is currently open
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    pub fn shared(&self) -> &'a Connectivity<M, C> {
        self.shared
    }

    /// Drive the machine until it halts
    ///
    /// Only returns once `Fatal` has been entered; the caller decides whether
    /// to park the task or reset the device.
    pub async fn run(&mut self) -> Halted {
        info!("Connectivity worker started");
        loop {
            if self.step().await.is_terminal() {
                let fault = self.shared.fault().unwrap_or(Fault::Unexpected);
                return Halted { fault };
            }
        }
    }

    /// Execute the current state's action, then move to the next state
    ///
    /// Returns the new state. In `Fatal` this does nothing.
    pub async fn step(&mut self) -> State {
        let current = self.state;
        if current.is_terminal() {
            return current;
        }

        self.execute(current).await;

        let next = transition(current, self.inputs());
        self.enter(current, next);
        next
    }

    fn inputs(&self) -> TransitionInputs {
        TransitionInputs {
            error: self.shared.status().error(),
            time_sync_required: self.time_sync_required,
            queue_empty: self.shared.queue().is_empty(),
            retries_exhausted: self.retries_exhausted(),
        }
    }

    fn retries_exhausted(&self) -> bool {
        matches!(
            self.config.session_retry_limit,
            Some(limit) if self.consecutive_retries > limit
        )
    }

    fn enter(&mut self, from: State, next: State) {
        debug!("{:?} -> {:?}", from, next);
        self.state = next;

        let status = self.shared.status();
        status.set_state(next);
        if next == State::Fatal {
            let fault = match from {
                State::Start => Fault::Unexpected,
                _ => status.fault().unwrap_or(Fault::Unexpected),
            };
            status.mark_fatal(fault);
            error!("Connectivity halted in {:?}: {}", from, fault);
        }
    }

    async fn execute(&mut self, state: State) {
        match state {
            State::Start | State::Ready | State::Fatal => {}
            State::ConnectNetwork => self.connect_network().await,
            State::SyncTime => self.sync_time().await,
            State::ConnectSession => self.connect_session().await,
            State::Publish => self.publish().await,
            State::CloseSession => self.close_session().await,
            State::DisconnectNetwork => self.disconnect_network().await,
            State::Idle => self.idle().await,
            State::RetrySession => self.retry_session(),
        }
    }

    async fn connect_network(&mut self) {
        info!("Bringing up network");
        if let Err(e) = self.network.start().await {
            warn!(
                "Network bring-up failed: {:?} ({:?})",
                e.kind(),
                Debug2Format(&e)
            );
            self.shared.status().raise(Fault::NetworkStart);
        }
    }

    async fn sync_time(&mut self) {
        // Attempted at most once per boot, whatever the outcome
        self.time_sync_required = false;

        info!("Synchronizing time");
        match self.time.sync().await {
            Ok(()) => info!("Time synchronized"),
            Err(e) => {
                warn!(
                    "Time synchronization failed: {:?} ({:?})",
                    e.kind(),
                    Debug2Format(&e)
                );
                self.shared.status().raise(Fault::TimeSync);
            }
        }
    }

    async fn connect_session(&mut self) {
        debug_assert!(self.session.is_none(), "at most one live session");

        match self.sessions.connect().await {
            Ok(session) => {
                self.session = Some(session);
                self.consecutive_retries = 0;
                if self.shared.status().mark_connected() {
                    info!("First session established");
                } else {
                    debug!("Session established");
                }
            }
            Err(e) => {
                warn!(
                    "Session connect failed: {:?} ({:?})",
                    e.kind(),
                    Debug2Format(&e)
                );
                self.shared.status().raise(Fault::SessionConnect);
            }
        }
    }

    async fn publish(&mut self) {
        let status = self.shared.status();
        let queue = self.shared.queue();

        let Some(session) = self.session.as_mut() else {
            error!("Publish requested without an open session");
            status.raise(Fault::Publish);
            return;
        };

        let mut sent: u32 = 0;
        while let Some(batch) = queue.dequeue() {
            let samples = batch.len();
            match self.sessions.publish(session, batch).await {
                Ok(()) => {
                    sent += 1;
                    status.count_published();
                    trace!("Published batch of {} samples", samples);
                }
                Err(e) => {
                    warn!(
                        "Publish failed after {} batches: {:?} ({:?})",
                        sent,
                        e.kind(),
                        Debug2Format(&e)
                    );
                    status.raise(Fault::Publish);
                    return;
                }
            }
        }
        info!("Published {} batches", sent);
    }

    async fn close_session(&mut self) {
        let Some(session) = self.session.take() else {
            debug!("No session to close");
            return;
        };
        match self.sessions.close(session).await {
            Ok(()) => debug!("Session closed"),
            Err(e) => {
                warn!(
                    "Session close failed: {:?} ({:?})",
                    e.kind(),
                    Debug2Format(&e)
                );
                self.shared.status().count_teardown_failure();
            }
        }
    }

    async fn disconnect_network(&mut self) {
        match self.network.stop().await {
            Ok(()) => debug!("Network down"),
            Err(e) => {
                warn!(
                    "Network teardown failed: {:?} ({:?})",
                    e.kind(),
                    Debug2Format(&e)
                );
                self.shared.status().count_teardown_failure();
            }
        }
    }

    async fn idle(&mut self) {
        let status = self.shared.status();

        // Wakes for batches drained during the last cycle
        let stale = self.shared.clear_wakes();
        if !self.shared.is_idle() {
            self.power.disallow(status);
            debug!("{} batches queued, skipping idle wait", self.shared.queued());
            return;
        }
        if stale > 0 {
            trace!("Discarded {} stale wakes", stale);
        }

        self.power.allow(status);
        info!("Waiting for telemetry");
        let event = self.shared.wait_for_wake().await;
        self.power.disallow(status);

        debug!("Woken by {:?}, {} batches queued", event, self.shared.queued());
    }

    fn retry_session(&mut self) {
        let status = self.shared.status();
        status.clear_error();
        status.count_session_retry();
        self.consecutive_retries = self.consecutive_retries.saturating_add(1);
        debug!("Session retry {}", self.consecutive_retries);
    }
}
