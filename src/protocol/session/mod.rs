//! Dashboard session: the single owner of the vehicle state.
//!
//! It keeps the decay/blink timeline alive and offers:
//!
//! * a command handle (`DashboardHandle`) to queue driver intents;
//! * a snapshot receiver (`StateFrames`) for the presentation layer.
//!
//! The integrator decides which features it needs by providing
//! pre-allocated [`embassy_sync::Channel`] instances. No allocation is
//! performed by the library and there is no dependency on a particular
//! platform: timing goes through [`TickTimer`], the wire through
//! [`SerialLink`].
use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    channel::{Channel, Receiver, Sender},
};
use embassy_time::Duration;
use futures_util::{future::select, future::Either, pin_mut};

use crate::config::SessionConfig;
use crate::core::{DriveMode, Intent, Side};
use crate::protocol::codec::{self, WireCommand};
use crate::protocol::transport::traits::{
    command_sender::CommandSender, serial_link::SerialLink, tick_timer::TickTimer,
};
use crate::protocol::vehicle::{Snapshot, VehicleState};

//==================================================================================Constants

/// Base tick of the session timeline; one decay step per tick.
pub const BASE_TICK: Duration = Duration::from_millis(100);
/// Blink half-period of an enabled turn signal.
pub const BLINK_PERIOD: Duration = Duration::from_millis(500);
/// Decay fires on every base tick.
pub const DECAY_TICKS: u64 = 1;
/// Blink toggles every this many base ticks, counted per side from the
/// tick at which the side was armed.
pub const BLINK_TICKS: u64 = BLINK_PERIOD.as_millis() / BASE_TICK.as_millis();

//==================================================================================TickSchedule

/// Actions due on one base tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickActions {
    pub decay: bool,
    pub blink_left: bool,
    pub blink_right: bool,
}

/// Pure tick bookkeeping for the two periodic behaviors (decay and
/// per-side blink). Deterministic: blink phase for a side depends only on
/// the number of ticks elapsed since that side was armed. Ticks are
/// dropped, never queued, so a stalled consumer just misses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSchedule {
    tick: u64,
    left_armed_at: Option<u64>,
    right_armed_at: Option<u64>,
}

impl TickSchedule {
    /// Fresh schedule with both blinkers disarmed.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            left_armed_at: None,
            right_armed_at: None,
        }
    }

    /// Advance the timeline by one base tick and report what is due.
    pub fn advance(&mut self) -> TickActions {
        self.tick += 1;
        TickActions {
            decay: self.tick % DECAY_TICKS == 0,
            blink_left: Self::blink_due(self.left_armed_at, self.tick),
            blink_right: Self::blink_due(self.right_armed_at, self.tick),
        }
    }

    fn blink_due(armed_at: Option<u64>, tick: u64) -> bool {
        match armed_at {
            Some(at) => tick > at && (tick - at) % BLINK_TICKS == 0,
            None => false,
        }
    }

    /// Start counting blink ticks for a side. Idempotent: arming an
    /// already-armed side keeps its phase.
    pub fn arm(&mut self, side: Side) {
        let tick = self.tick;
        let slot = self.slot(side);
        if slot.is_none() {
            *slot = Some(tick);
        }
    }

    /// Stop blink ticks for a side.
    pub fn disarm(&mut self, side: Side) {
        *self.slot(side) = None;
    }

    /// Whether a side currently receives blink ticks.
    pub fn is_armed(&self, side: Side) -> bool {
        match side {
            Side::Left => self.left_armed_at.is_some(),
            Side::Right => self.right_armed_at.is_some(),
        }
    }

    /// Ticks elapsed since the session started.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    fn slot(&mut self, side: Side) -> &mut Option<u64> {
        match side {
            Side::Left => &mut self.left_armed_at,
            Side::Right => &mut self.right_armed_at,
        }
    }
}

//==================================================================================Commands

/// Messages accepted by the session runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionCommand {
    /// A driver intent, already decoded by the input layer.
    Intent(Intent),
    /// Direct signal control for callers that bypass the toggle intents.
    SetSignal { side: Side, enabled: bool },
    /// Stop the runner and release the link.
    Close,
}

//==================================================================================Service

/// Service assembling the session components.
pub struct DashboardService<'a, L, T, const CMD_CAP: usize, const SNAP_CAP: usize>
where
    L: SerialLink,
    T: TickTimer,
{
    state: VehicleState,
    link: Option<L>,
    timer: T,
    command_channel: &'a Channel<CriticalSectionRawMutex, SessionCommand, CMD_CAP>,
    snapshot_channel: Option<&'a Channel<CriticalSectionRawMutex, Snapshot, SNAP_CAP>>,
}

impl<'a, L, T, const CMD_CAP: usize, const SNAP_CAP: usize>
    DashboardService<'a, L, T, CMD_CAP, SNAP_CAP>
where
    L: SerialLink,
    L::Error: core::fmt::Debug,
    T: TickTimer,
{
    /// Assemble a session.
    ///
    /// `link` decides the drive mode: `Some` runs linked (telemetry owns
    /// the gauges), `None` runs a local simulation. The snapshot channel
    /// is optional; without it the session still runs, headless.
    pub fn new(
        config: &SessionConfig,
        link: Option<L>,
        timer: T,
        command_channel: &'a Channel<CriticalSectionRawMutex, SessionCommand, CMD_CAP>,
        snapshot_channel: Option<&'a Channel<CriticalSectionRawMutex, Snapshot, SNAP_CAP>>,
    ) -> Self {
        let mode = if link.is_some() {
            DriveMode::Linked
        } else {
            DriveMode::Simulation
        };
        Self {
            state: VehicleState::new(config, mode),
            link,
            timer,
            command_channel,
            snapshot_channel,
        }
    }

    /// Split into handle/receiver/runner components.
    pub fn into_parts(self) -> DashboardParts<'a, L, T, CMD_CAP, SNAP_CAP> {
        let handle = DashboardHandle {
            sender: self.command_channel.sender(),
        };
        let frames = self.snapshot_channel.map(|channel| StateFrames {
            receiver: channel.receiver(),
        });
        DashboardParts {
            handle,
            frames,
            runner: SessionRunner {
                core: SessionCore {
                    state: self.state,
                    schedule: TickSchedule::new(),
                    link: self.link,
                    snapshot_channel: self.snapshot_channel,
                    last_snapshot: None,
                },
                timer: self.timer,
                command_channel: self.command_channel,
            },
        }
    }
}

/// Bundle returned by [`DashboardService::into_parts`].
pub struct DashboardParts<'a, L, T, const CMD_CAP: usize, const SNAP_CAP: usize>
where
    L: SerialLink,
    T: TickTimer,
{
    pub handle: DashboardHandle<'a, CMD_CAP>,
    pub frames: Option<StateFrames<'a, SNAP_CAP>>,
    pub runner: SessionRunner<'a, L, T, CMD_CAP, SNAP_CAP>,
}

//==================================================================================Handle

/// Cloneable command handle for the input layer.
#[derive(Clone)]
pub struct DashboardHandle<'a, const CMD_CAP: usize> {
    sender: Sender<'a, CriticalSectionRawMutex, SessionCommand, CMD_CAP>,
}

impl<'a, const CMD_CAP: usize> DashboardHandle<'a, CMD_CAP> {
    /// Queue a command, waiting for channel space.
    pub async fn send(&self, command: SessionCommand) {
        self.sender.send(command).await;
    }

    /// Queue a command without waiting; reports whether it was accepted.
    pub fn try_send(&self, command: SessionCommand) -> bool {
        self.sender.try_send(command).is_ok()
    }

    /// Queue a driver intent.
    pub async fn intent(&self, intent: Intent) {
        self.send(SessionCommand::Intent(intent)).await;
    }

    /// Ask the runner to stop and release the link.
    pub async fn close(&self) {
        self.send(SessionCommand::Close).await;
    }
}

/// Snapshot receiver for the presentation layer.
pub struct StateFrames<'a, const SNAP_CAP: usize> {
    receiver: Receiver<'a, CriticalSectionRawMutex, Snapshot, SNAP_CAP>,
}

impl<'a, const SNAP_CAP: usize> StateFrames<'a, SNAP_CAP> {
    /// Wait for the next published snapshot.
    pub async fn next(&self) -> Snapshot {
        self.receiver.receive().await
    }

    /// Fetch a published snapshot without waiting.
    pub fn try_next(&self) -> Option<Snapshot> {
        self.receiver.try_receive().ok()
    }
}

//==================================================================================Runner

/// Runner that drives the session loop.
pub struct SessionRunner<'a, L, T, const CMD_CAP: usize, const SNAP_CAP: usize>
where
    L: SerialLink,
    T: TickTimer,
{
    core: SessionCore<'a, L, SNAP_CAP>,
    timer: T,
    command_channel: &'a Channel<CriticalSectionRawMutex, SessionCommand, CMD_CAP>,
}

/// Session state plus every mutation path, split from the timer so a
/// pending tick delay can stay alive while commands are handled.
struct SessionCore<'a, L, const SNAP_CAP: usize>
where
    L: SerialLink,
{
    state: VehicleState,
    schedule: TickSchedule,
    link: Option<L>,
    snapshot_channel: Option<&'a Channel<CriticalSectionRawMutex, Snapshot, SNAP_CAP>>,
    last_snapshot: Option<Snapshot>,
}

impl<'a, L, T, const CMD_CAP: usize, const SNAP_CAP: usize>
    SessionRunner<'a, L, T, CMD_CAP, SNAP_CAP>
where
    L: SerialLink,
    L::Error: core::fmt::Debug,
    T: TickTimer,
{
    /// Run the session until a [`SessionCommand::Close`] arrives, then
    /// hand the link back to the caller.
    ///
    /// Every mutation path — intents, telemetry, decay, blink — runs on
    /// this one cooperative timeline, so the vehicle state needs no lock.
    /// One tick delay is created per period and re-selected until it
    /// fires; handling a command never restarts the period, so sustained
    /// input cannot starve decay or blink.
    pub async fn drive(mut self) -> Option<L> {
        let command_channel = self.command_channel;
        self.core.publish_snapshot();

        loop {
            let tick_future = self.timer.delay_ms(BASE_TICK.as_millis() as u32);
            pin_mut!(tick_future);

            loop {
                let winner = {
                    let command_future = command_channel.receive();
                    pin_mut!(command_future);
                    match select(command_future, tick_future.as_mut()).await {
                        Either::Left((command, _)) => Some(command),
                        Either::Right(((), _)) => None,
                    }
                };

                match winner {
                    Some(SessionCommand::Close) => {
                        #[cfg(feature = "defmt")]
                        defmt::info!("Session closed, releasing link");
                        return self.core.link.take();
                    }
                    Some(SessionCommand::Intent(intent)) => {
                        self.core.handle_intent(intent).await;
                    }
                    Some(SessionCommand::SetSignal { side, enabled }) => {
                        self.core.state.set_signal(side, enabled);
                        self.core.sync_blinkers();
                    }
                    // Tick fired; leave the inner loop to run it and
                    // start the next period.
                    None => break,
                }
                self.core.publish_snapshot();
            }

            self.core.on_tick();
            self.core.publish_snapshot();
        }
    }
}

impl<'a, L, const SNAP_CAP: usize> SessionCore<'a, L, SNAP_CAP>
where
    L: SerialLink,
    L::Error: core::fmt::Debug,
{
    async fn handle_intent(&mut self, intent: Intent) {
        let wire = self.state.apply_intent(intent);
        // Toggle intents may have flipped a signal; keep the blink
        // timeline in step with the signal states.
        self.sync_blinkers();
        if let Some(command) = wire {
            self.transmit(command).await;
        }
    }

    /// Fire-and-forget transmission: a failed send is logged and the
    /// intent is dropped (state is mirrored locally anyway).
    async fn transmit(&mut self, command: WireCommand) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        if let Err(_err) = link.send_command(command).await {
            #[cfg(feature = "defmt")]
            defmt::warn!("Link send failed, dropping command byte {=u8}", command.encode());
        }
    }

    /// One base tick: drain telemetry, then run the due periodic actions.
    fn on_tick(&mut self) {
        self.poll_telemetry();
        let actions = self.schedule.advance();
        if actions.decay {
            self.state.decay();
        }
        if actions.blink_left {
            self.state.toggle_blink(Side::Left);
        }
        if actions.blink_right {
            self.state.toggle_blink(Side::Right);
        }
    }

    /// Drain every buffered telemetry line from the link. Malformed
    /// lines are dropped without touching state; a link error ends the
    /// drain for this tick (no reconnect, next tick polls again).
    fn poll_telemetry(&mut self) {
        let Some(link) = self.link.as_mut() else {
            return;
        };
        loop {
            match link.poll_line() {
                Ok(Some(line)) => match codec::decode_line_bytes(&line) {
                    Ok(frame) => self.state.apply_telemetry(frame),
                    Err(_err) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("Dropped malformed telemetry line");
                    }
                },
                Ok(None) => break,
                Err(_err) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("Link receive failed, keeping last known-good state");
                    break;
                }
            }
        }
    }

    /// Arm or disarm the blink timeline to match the signal states.
    /// Arming is idempotent, so a side already blinking keeps its phase.
    fn sync_blinkers(&mut self) {
        for side in [Side::Left, Side::Right] {
            if self.state.signal(side).is_enabled() {
                self.schedule.arm(side);
            } else {
                self.schedule.disarm(side);
            }
        }
    }

    /// Publish a snapshot when the observable state changed. `try_send`
    /// on purpose: a stalled presentation layer misses frames instead of
    /// stalling the session. Only delivered frames are recorded, so a
    /// frame refused by a full channel is retried on later passes and
    /// the latest state always reaches a consumer that catches up.
    fn publish_snapshot(&mut self) {
        let Some(channel) = self.snapshot_channel else {
            return;
        };
        let snapshot = self.state.snapshot();
        if self.last_snapshot != Some(snapshot) && channel.try_send(snapshot).is_ok() {
            self.last_snapshot = Some(snapshot);
        }
    }
}
