//! Lifecycle controller
//!
//! The controller is the only code that touches the charger, the gauge and
//! the lifecycle state. Everything else talks to it through the event
//! channel. Timed sequences (refusal notice, sleep, shutdown) run to
//! completion before the next event is taken.

use core::fmt::Write;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::Mutex;
use embassy_time::{Duration, Ticker};
use embedded_hal_async::delay::DelayNs;
use heapless::String;
use vigil_core::battery::{BatterySampler, GuardStatus};
use vigil_core::boot::{BootBackoff, BootHold, HoldStatus};
use vigil_core::config::{ChargerConfig, LifecycleConfig};
use vigil_core::state::{LifecycleEvent, LifecycleState, Step};
use vigil_core::traits::{
    Charger, Gauge, NetworkType, Screen, StatusDisplay, StatusDisplayExt, System,
};
use vigil_core::PowerError;
use vigil_hal::{RetainedMemory, RetainedSlot, SleepControl, WakeCause};

use crate::channels::{EventChannel, EventSender};
use crate::fmt::*;
use crate::modem::ModemHandle;

/// Status strings shown on the tip screen
pub mod text {
    pub const NO_BATTERY: &str = "Charging, please wait";
    pub const CHARGING_NO_SHUTDOWN: &str = "Cannot power off while charging";
    pub const LOW_BATTERY: &str = "Battery low";
    pub const LOW_BATTERY_DETAIL: &str = "Please charge";
    pub const LOW_BATTERY_CHARGING: &str = "Battery low, charging";
}

/// Hardware and collaborators handed to the controller
pub struct Board<'a, M: RawMutex, C, G, D, S, P, R, L> {
    pub charger: C,
    pub gauge: G,
    pub display: &'a Mutex<M, D>,
    pub system: S,
    pub sleep: P,
    pub retained: R,
    pub delay: L,
}

/// How boot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootOutcome {
    /// Battery present and usable; start the event loop
    Ready,
    /// No battery; deep sleep was requested for `retry_in_s` seconds
    AwaitingBattery { retry_in_s: u32 },
    /// The board powered itself off
    Halted,
}

/// Result of handling one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    Continue,
    Halted,
}

pub struct LifecycleController<'a, M: RawMutex, C, G, D, S, P, R, L> {
    state: LifecycleState,
    config: LifecycleConfig,
    charger_config: ChargerConfig,
    charger: C,
    gauge: G,
    display: &'a Mutex<M, D>,
    system: S,
    sleep: P,
    retained: R,
    delay: L,
    events: &'a EventChannel<M>,
    modem: ModemHandle<'a, M>,
    sampler: BatterySampler,
    /// Screen to bring back once the low-battery prompt clears
    saved_screen: Option<Screen>,
    /// Auto sleep was toggled by hand; charging no longer drives it
    auto_sleep_user_set: bool,
}

impl<'a, M, C, G, D, S, P, R, L> LifecycleController<'a, M, C, G, D, S, P, R, L>
where
    M: RawMutex,
    C: Charger,
    G: Gauge,
    D: StatusDisplay,
    S: System,
    P: SleepControl,
    R: RetainedMemory,
    L: DelayNs,
{
    pub fn new(
        board: Board<'a, M, C, G, D, S, P, R, L>,
        events: &'a EventChannel<M>,
        modem: ModemHandle<'a, M>,
        config: LifecycleConfig,
        charger_config: ChargerConfig,
    ) -> Self {
        let sampler = BatterySampler::from_config(&config);
        Self {
            state: LifecycleState::Booting,
            config,
            charger_config,
            charger: board.charger,
            gauge: board.gauge,
            display: board.display,
            system: board.system,
            sleep: board.sleep,
            retained: board.retained,
            delay: board.delay,
            events,
            modem,
            sampler,
            saved_screen: None,
            auto_sleep_user_set: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// Sender posting back into this controller's queue
    pub fn sender(&self) -> EventSender<'a, M> {
        EventSender::new(self.events)
    }

    fn step(&mut self, step: Step) {
        let next = self.state.transition(step);
        if next != self.state {
            info!("lifecycle: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }

    /// Charge phase, with an unreadable phase counted as not charging
    async fn charging(&mut self) -> bool {
        match self.charger.charge_state().await {
            Ok(state) => state.is_charging(),
            Err(e) => {
                warn!("charge state unreadable: {:?}", e);
                false
            }
        }
    }

    /// Battery detection, charger setup, low-voltage hold and modem bring-up
    pub async fn boot(&mut self) -> BootOutcome {
        let retries = self.retained.load(RetainedSlot::BootRetryCount);
        self.state = LifecycleState::at_boot(retries);
        let mut backoff = BootBackoff::resume(self.config.backoff, retries);

        if !self.gauge.detect().await {
            self.step(Step::BatteryMissing);
            if self.sleep.wake_cause() != WakeCause::Timer {
                self.display.lock().await.show_tip(text::NO_BATTERY, "");
            }

            let retry_in_s = backoff.battery_missing();
            self.retained
                .store(RetainedSlot::BootRetryCount, backoff.retries());
            warn!(
                "no battery, deep sleep {} s (attempt {})",
                retry_in_s,
                backoff.retries()
            );
            self.sleep
                .deep_sleep(Duration::from_secs(u64::from(retry_in_s)));
            return BootOutcome::AwaitingBattery { retry_in_s };
        }

        backoff.battery_found();
        self.retained
            .store(RetainedSlot::BootRetryCount, backoff.retries());
        self.step(Step::BatteryDetected);

        if let Err(e) = self.charger.configure(&self.charger_config).await {
            error!("charger setup failed: {:?}", e);
        }

        if self.hold_low_voltage().await == Dispatch::Halted {
            return BootOutcome::Halted;
        }

        self.bring_up_modem();
        BootOutcome::Ready
    }

    /// Keep a low-voltage boot on the tip screen, once per poll interval
    async fn hold_low_voltage(&mut self) -> Dispatch {
        let mut hold = BootHold::new(
            self.config.thresholds.boot_hold_mv,
            self.config.boot_hold_secs,
        );

        let mut shown = false;

        loop {
            let voltage_mv = match self.gauge.voltage_mv().await {
                Ok(mv) => mv,
                Err(e) => {
                    warn!("boot hold: voltage unreadable: {:?}", e);
                    return Dispatch::Continue;
                }
            };
            let charging = self.charging().await;

            let mut title: String<64> = String::new();
            match hold.update(voltage_mv, charging) {
                HoldStatus::Clear => {
                    if shown {
                        self.display
                            .lock()
                            .await
                            .request_screen_transition(Screen::Main);
                    }
                    return Dispatch::Continue;
                }
                HoldStatus::Charging => {
                    let _ = title.push_str(text::LOW_BATTERY_CHARGING);
                }
                HoldStatus::Countdown { remaining } => {
                    let _ = write!(title, "{}, off in {} s", text::LOW_BATTERY, remaining);
                }
                HoldStatus::Expired => {
                    warn!("boot hold expired at {} mV", voltage_mv);
                    return self.shutdown().await;
                }
            }

            let mut detail: String<64> = String::new();
            match self.gauge.current_ma().await {
                Ok(current_ma) => {
                    let _ = write!(detail, "{} mV, {} mA", voltage_mv, current_ma);
                    info!("boot hold: {} mV, {} mA", voltage_mv, current_ma);
                }
                Err(e) => {
                    warn!("boot hold: current unreadable: {:?}", e);
                    let _ = write!(detail, "{} mV", voltage_mv);
                }
            }

            self.display.lock().await.show_tip(&title, &detail);
            shown = true;
            self.delay.delay_ms(self.config.poll_interval_ms).await;
        }
    }

    /// Power the modem on, and back off again when running on WiFi
    fn bring_up_modem(&mut self) {
        let network = self.system.network_type();
        info!("network: {:?}", network);

        if let Err(e) = self.modem.request_power_on() {
            error!("modem power on not queued: {:?}", e);
        }
        if network == NetworkType::Wifi {
            if let Err(e) = self.modem.request_power_off(self.config.modem_settle_ms) {
                error!("modem power off not queued: {:?}", e);
            }
        }
    }

    /// Handle one event
    pub async fn dispatch(&mut self, event: LifecycleEvent) -> Dispatch {
        if self.state.is_terminal() {
            return Dispatch::Halted;
        }
        if !self.state.accepts_events() {
            warn!("event {:?} ignored in {:?}", event, self.state);
            return Dispatch::Continue;
        }
        if event.is_power_event() {
            info!("dispatch {:?}", event);
        } else {
            debug!("dispatch {:?}", event);
        }

        match event {
            LifecycleEvent::Shutdown => self.shutdown().await,
            LifecycleEvent::Sleep => self.sleep().await,
            LifecycleEvent::WakeUp => Dispatch::Continue,
            LifecycleEvent::SwitchNetwork => {
                self.system.switch_network();
                Dispatch::Continue
            }
            LifecycleEvent::ClearNetworkConfig => {
                if self.system.network_type() == NetworkType::Wifi {
                    self.system.reset_wifi_config();
                } else {
                    debug!("no WiFi config to clear");
                }
                Dispatch::Continue
            }
            LifecycleEvent::ManualSleep => {
                if self.system.is_enabled() {
                    // The timer posts Sleep itself
                    self.system.manual_sleep();
                    Dispatch::Continue
                } else {
                    self.sleep().await
                }
            }
            LifecycleEvent::ToggleAutoSleep => {
                let enable = !self.system.is_enabled();
                self.system.set_enabled(enable);
                self.auto_sleep_user_set = true;
                self.display.lock().await.show_auto_sleep(enable);
                info!("auto sleep {}", enable);
                Dispatch::Continue
            }
        }
    }

    /// Power off through shipping mode; refused while charging
    async fn shutdown(&mut self) -> Dispatch {
        if self.charging().await {
            info!("shutdown refused, charging");
            let previous = {
                let mut display = self.display.lock().await;
                let previous = display.active_screen();
                display.show_tip(text::CHARGING_NO_SHUTDOWN, "");
                previous
            };
            self.delay.delay_ms(self.config.refusal_notice_ms).await;
            self.display.lock().await.swap_screen(previous);
            return Dispatch::Continue;
        }

        self.step(Step::ShutdownStarted);
        self.display
            .lock()
            .await
            .request_screen_transition(Screen::Shutdown);
        self.system.enable_codec_io(false);
        self.system.stop_audio();

        let attempts = self.config.network_confirm_attempts;
        let interval_ms = match self.system.network_type() {
            NetworkType::Cellular => {
                if let Err(e) = self.modem.request_power_off(0) {
                    error!("modem power off not queued: {:?}", e);
                }
                self.config.modem_confirm_interval_ms
            }
            NetworkType::Wifi => self.config.wifi_confirm_interval_ms,
        };
        if let Err(e) = self.wait_modem_off(attempts, interval_ms).await {
            warn!("modem still {:?}: {:?}", self.modem.state(), e);
        }

        if let Err(e) = self.charger.set_shipping_mode(true).await {
            error!("shipping mode failed: {:?}", e);
        }
        self.delay.delay_ms(self.config.shipping_hold_ms).await;
        self.sleep.power_off();
        self.step(Step::PoweredOff);
        Dispatch::Halted
    }

    async fn wait_modem_off(&mut self, attempts: u8, interval_ms: u32) -> Result<(), PowerError> {
        for _ in 0..attempts {
            if self.modem.is_off() {
                return Ok(());
            }
            self.delay.delay_ms(interval_ms).await;
        }
        if self.modem.is_off() {
            Ok(())
        } else {
            Err(PowerError::SequenceTimeout)
        }
    }

    /// Light-sleep loop with periodic battery checks
    async fn sleep(&mut self) -> Dispatch {
        info!("entering sleep");
        let wake_word = self.system.wake_word_running();
        if wake_word {
            self.system.enable_wake_word(false);
            self.delay.delay_ms(self.config.audio_settle_ms).await;
        }
        self.system.enable_codec_io(false);
        self.system.stop_audio();

        let previous = self.display.lock().await.swap_screen(Screen::Sleep);
        self.delay.delay_ms(self.config.audio_settle_ms).await;
        self.step(Step::SleepEntered);

        let wake_after = Duration::from_secs(u64::from(self.config.sleep_wake_interval_s));
        loop {
            let cause = self.sleep.light_sleep(wake_after).await;
            if cause != WakeCause::Timer {
                info!("woke: {:?}", cause);
                break;
            }
            if self.battery_exhausted().await {
                warn!("battery empty during sleep, shutting down");
                if self.shutdown().await == Dispatch::Halted {
                    return Dispatch::Halted;
                }
            }
        }

        self.display.lock().await.swap_screen(previous);
        self.system.enable_codec_io(true);
        self.system.start_audio();
        if wake_word {
            self.system.enable_wake_word(true);
        }
        self.system.wake_up();
        self.step(Step::Woke);
        Dispatch::Continue
    }

    /// True when every sleep check sample is empty and not charging
    async fn battery_exhausted(&mut self) -> bool {
        let samples = self.config.sleep_check_samples;
        let empty_mv = self.config.thresholds.empty_mv;
        let mut low = 0u8;

        for i in 0..samples {
            match self.gauge.voltage_mv().await {
                Ok(mv) => {
                    debug!("sleep check {}: {} mV", i + 1, mv);
                    if mv <= empty_mv && !self.charging().await {
                        low += 1;
                    }
                }
                Err(e) => warn!("sleep check {}: {:?}", i + 1, e),
            }
            self.delay.delay_ms(self.config.sleep_check_spacing_ms).await;
        }

        samples > 0 && low == samples
    }

    /// One poll-loop tick: sample the battery when due and act on it
    ///
    /// An expired low-battery countdown is handled as a Shutdown event on the
    /// spot, so it cannot be lost to a full queue.
    pub async fn tick(&mut self) -> Dispatch {
        if !self.state.accepts_events() || !self.sampler.tick() {
            return Dispatch::Continue;
        }
        let sample = match self.sampler.sample(&mut self.gauge, &mut self.charger).await {
            Ok(sample) => sample,
            Err(e) if e.is_bus_fault() => {
                warn!("battery sample skipped: {:?}", e);
                return Dispatch::Continue;
            }
            Err(e) => {
                error!("battery sample failed: {:?}", e);
                return Dispatch::Continue;
            }
        };
        debug!(
            "battery: {} mV, {}%, charging {}",
            sample.voltage_mv, sample.level, sample.charging
        );

        let mut display = self.display.lock().await;
        if sample.level_changed {
            display.show_battery_level(sample.level);
        }
        if sample.charging_changed && !self.auto_sleep_user_set {
            let enable = !sample.charging;
            self.system.set_enabled(enable);
            display.show_auto_sleep(enable);
        }

        match sample.guard {
            GuardStatus::Idle => {
                if let Some(screen) = self.saved_screen.take() {
                    display.swap_screen(screen);
                }
            }
            GuardStatus::Counting { remaining } => {
                display.show_countdown(remaining);
                if remaining == self.config.low_battery_notice_at && self.saved_screen.is_none() {
                    let previous = display.active_screen();
                    display.show_tip(text::LOW_BATTERY, text::LOW_BATTERY_DETAIL);
                    self.saved_screen = Some(previous);
                }
            }
            GuardStatus::Expired => {
                drop(display);
                warn!("battery empty, shutting down");
                return self.dispatch(LifecycleEvent::Shutdown).await;
            }
        }
        Dispatch::Continue
    }

    /// Take events until one halts the board, ticking once per poll interval
    ///
    /// The ticker is polled first and keeps its deadline across events, so a
    /// busy queue cannot hold off battery sampling.
    pub async fn run(&mut self) {
        info!("lifecycle: event loop in {:?}", self.state);
        let poll = Duration::from_millis(u64::from(self.config.poll_interval_ms));
        let mut ticker = Ticker::every(poll);
        loop {
            let outcome = match select(ticker.next(), self.events.receive()).await {
                Either::First(()) => {
                    let outcome = self.tick().await;
                    // No catch-up burst after a long sleep or shutdown notice
                    ticker.reset();
                    outcome
                }
                Either::Second(event) => self.dispatch(event).await,
            };
            if outcome == Dispatch::Halted {
                break;
            }
        }
    }
}
