//! Host-side doubles for the lifecycle controller
//!
//! Each double shares its state through `Rc<RefCell<_>>` so a test can keep
//! a handle while the controller owns the clone.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::Duration;
use embedded_hal::digital::{ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;
use vigil_core::config::{ChargerConfig, LifecycleConfig};
use vigil_core::traits::{
    AudioControl, Charger, ChargerState, Gauge, NetworkSelector, NetworkType, PowerSaveTimer,
    Screen, StatusDisplay,
};
use vigil_core::PowerError;
use vigil_drivers::modem::ModemStatus;
use vigil_hal::{RetainedMemory, RetainedSlot, SleepControl, WakeCause};
use vigil_runtime::channels::{EventChannel, ModemChannel};
use vigil_runtime::{Board, LifecycleController, ModemHandle};

#[derive(Debug)]
pub struct ChargerLog {
    pub state: Result<ChargerState, PowerError>,
    pub shipping: Vec<bool>,
    pub configured: usize,
}

impl Default for ChargerLog {
    fn default() -> Self {
        Self {
            state: Ok(ChargerState::NotCharging),
            shipping: Vec::new(),
            configured: 0,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockCharger(pub Rc<RefCell<ChargerLog>>);

impl MockCharger {
    pub fn set_state(&self, state: ChargerState) {
        self.0.borrow_mut().state = Ok(state);
    }
}

impl Charger for MockCharger {
    async fn charge_state(&mut self) -> Result<ChargerState, PowerError> {
        self.0.borrow().state
    }

    async fn set_shipping_mode(&mut self, enable: bool) -> Result<(), PowerError> {
        self.0.borrow_mut().shipping.push(enable);
        Ok(())
    }

    async fn configure(&mut self, _config: &ChargerConfig) -> Result<(), PowerError> {
        self.0.borrow_mut().configured += 1;
        Ok(())
    }
}

#[derive(Debug)]
pub struct GaugeLog {
    pub present: bool,
    /// Readings returned first, oldest first
    pub queued: VecDeque<u16>,
    /// Reading once the queue is empty
    pub voltage_mv: u16,
    /// `None` makes current reads fail
    pub current_ma: Option<i16>,
}

impl Default for GaugeLog {
    fn default() -> Self {
        Self {
            present: true,
            queued: VecDeque::new(),
            voltage_mv: 3900,
            current_ma: Some(0),
        }
    }
}

#[derive(Clone, Default)]
pub struct MockGauge(pub Rc<RefCell<GaugeLog>>);

impl MockGauge {
    pub fn set_voltage(&self, voltage_mv: u16) {
        self.0.borrow_mut().voltage_mv = voltage_mv;
    }

    pub fn queue(&self, readings: &[u16]) {
        self.0.borrow_mut().queued.extend(readings.iter().copied());
    }
}

impl Gauge for MockGauge {
    async fn detect(&mut self) -> bool {
        self.0.borrow().present
    }

    async fn voltage_mv(&mut self) -> Result<u16, PowerError> {
        let mut gauge = self.0.borrow_mut();
        let fallback = gauge.voltage_mv;
        Ok(gauge.queued.pop_front().unwrap_or(fallback))
    }

    async fn current_ma(&mut self) -> Result<i16, PowerError> {
        self.0.borrow().current_ma.ok_or(PowerError::BusTimeout)
    }
}

#[derive(Debug)]
pub struct MockDisplay {
    pub screen: Screen,
    pub transitions: Vec<Screen>,
    pub titles: Vec<String>,
    pub details: Vec<String>,
    pub countdowns: Vec<u8>,
    pub levels: Vec<u8>,
    pub auto_sleep: Vec<bool>,
}

impl Default for MockDisplay {
    fn default() -> Self {
        Self {
            screen: Screen::Main,
            transitions: Vec::new(),
            titles: Vec::new(),
            details: Vec::new(),
            countdowns: Vec::new(),
            levels: Vec::new(),
            auto_sleep: Vec::new(),
        }
    }
}

impl StatusDisplay for MockDisplay {
    fn set_status_text(&mut self, title: &str, detail: &str) {
        self.titles.push(title.to_string());
        self.details.push(detail.to_string());
    }

    fn request_screen_transition(&mut self, screen: Screen) {
        self.screen = screen;
        self.transitions.push(screen);
    }

    fn active_screen(&self) -> Screen {
        self.screen
    }

    fn show_countdown(&mut self, seconds: u8) {
        self.countdowns.push(seconds);
    }

    fn show_battery_level(&mut self, level: u8) {
        self.levels.push(level);
    }

    fn show_auto_sleep(&mut self, enabled: bool) {
        self.auto_sleep.push(enabled);
    }
}

#[derive(Debug)]
pub struct SystemLog {
    pub network: NetworkType,
    pub wake_word: bool,
    pub wake_word_calls: Vec<bool>,
    pub codec_io: Vec<bool>,
    pub audio_starts: usize,
    pub audio_stops: usize,
    pub power_save: bool,
    pub power_save_calls: Vec<bool>,
    pub wake_ups: usize,
    pub manual_sleeps: usize,
    pub switches: usize,
    pub wifi_resets: usize,
}

impl Default for SystemLog {
    fn default() -> Self {
        Self {
            network: NetworkType::Wifi,
            wake_word: true,
            wake_word_calls: Vec::new(),
            codec_io: Vec::new(),
            audio_starts: 0,
            audio_stops: 0,
            power_save: true,
            power_save_calls: Vec::new(),
            wake_ups: 0,
            manual_sleeps: 0,
            switches: 0,
            wifi_resets: 0,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockSystem(pub Rc<RefCell<SystemLog>>);

impl AudioControl for MockSystem {
    fn wake_word_running(&self) -> bool {
        self.0.borrow().wake_word
    }

    fn enable_wake_word(&mut self, enable: bool) {
        let mut log = self.0.borrow_mut();
        log.wake_word = enable;
        log.wake_word_calls.push(enable);
    }

    fn enable_codec_io(&mut self, enable: bool) {
        self.0.borrow_mut().codec_io.push(enable);
    }

    fn start_audio(&mut self) {
        self.0.borrow_mut().audio_starts += 1;
    }

    fn stop_audio(&mut self) {
        self.0.borrow_mut().audio_stops += 1;
    }
}

impl PowerSaveTimer for MockSystem {
    fn set_enabled(&mut self, enable: bool) {
        let mut log = self.0.borrow_mut();
        log.power_save = enable;
        log.power_save_calls.push(enable);
    }

    fn is_enabled(&self) -> bool {
        self.0.borrow().power_save
    }

    fn wake_up(&mut self) {
        self.0.borrow_mut().wake_ups += 1;
    }

    fn manual_sleep(&mut self) {
        self.0.borrow_mut().manual_sleeps += 1;
    }
}

impl NetworkSelector for MockSystem {
    fn network_type(&self) -> NetworkType {
        self.0.borrow().network
    }

    fn switch_network(&mut self) {
        self.0.borrow_mut().switches += 1;
    }

    fn reset_wifi_config(&mut self) {
        self.0.borrow_mut().wifi_resets += 1;
    }
}

#[derive(Debug)]
pub struct SleepLog {
    pub wake_cause: WakeCause,
    /// Causes returned by successive light sleeps; `External` once empty
    pub wakes: VecDeque<WakeCause>,
    pub light_sleeps: Vec<Duration>,
    pub deep_sleeps: Vec<Duration>,
    pub powered_off: bool,
}

impl Default for SleepLog {
    fn default() -> Self {
        Self {
            wake_cause: WakeCause::PowerOn,
            wakes: VecDeque::new(),
            light_sleeps: Vec::new(),
            deep_sleeps: Vec::new(),
            powered_off: false,
        }
    }
}

#[derive(Clone, Default)]
pub struct MockSleep(pub Rc<RefCell<SleepLog>>);

impl MockSleep {
    pub fn script(&self, wakes: &[WakeCause]) {
        self.0.borrow_mut().wakes.extend(wakes.iter().copied());
    }
}

impl SleepControl for MockSleep {
    fn wake_cause(&self) -> WakeCause {
        self.0.borrow().wake_cause
    }

    async fn light_sleep(&mut self, wake_after: Duration) -> WakeCause {
        let mut log = self.0.borrow_mut();
        log.light_sleeps.push(wake_after);
        log.wakes.pop_front().unwrap_or(WakeCause::External)
    }

    fn deep_sleep(&mut self, wake_after: Duration) {
        self.0.borrow_mut().deep_sleeps.push(wake_after);
    }

    fn power_off(&mut self) {
        self.0.borrow_mut().powered_off = true;
    }
}

#[derive(Clone, Default)]
pub struct MockRetained(pub Rc<RefCell<[u32; RetainedSlot::COUNT]>>);

impl RetainedMemory for MockRetained {
    fn load(&self, slot: RetainedSlot) -> u32 {
        self.0.borrow()[slot.as_u8() as usize]
    }

    fn store(&mut self, slot: RetainedSlot, value: u32) {
        self.0.borrow_mut()[slot.as_u8() as usize] = value;
    }
}

/// Records each delay in ms and yields once so other futures get polled
#[derive(Clone, Default)]
pub struct MockDelay(pub Rc<RefCell<Vec<u32>>>);

impl MockDelay {
    pub fn calls(&self) -> Vec<u32> {
        self.0.borrow().clone()
    }
}

impl DelayNs for MockDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().push(ns / 1_000_000);
        yield_now().await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.0.borrow_mut().push(ms);
        yield_now().await;
    }
}

#[derive(Clone, Default)]
pub struct MockPin(pub Rc<RefCell<Vec<bool>>>);

impl ErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().push(true);
        Ok(())
    }
}

pub type Controller<'a> = LifecycleController<
    'a,
    NoopRawMutex,
    MockCharger,
    MockGauge,
    MockDisplay,
    MockSystem,
    MockSleep,
    MockRetained,
    MockDelay,
>;

/// One board's worth of doubles plus the channels the controller uses
pub struct Rig {
    pub charger: MockCharger,
    pub gauge: MockGauge,
    pub system: MockSystem,
    pub sleep: MockSleep,
    pub retained: MockRetained,
    pub delay: MockDelay,
    pub display: Mutex<NoopRawMutex, MockDisplay>,
    pub events: EventChannel<NoopRawMutex>,
    pub modem_commands: ModemChannel<NoopRawMutex>,
    pub modem_status: ModemStatus,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            charger: MockCharger::default(),
            gauge: MockGauge::default(),
            system: MockSystem::default(),
            sleep: MockSleep::default(),
            retained: MockRetained::default(),
            delay: MockDelay::default(),
            display: Mutex::new(MockDisplay::default()),
            events: EventChannel::new(),
            modem_commands: ModemChannel::new(),
            modem_status: ModemStatus::new(),
        }
    }

    /// A fresh controller over this rig, as after a reset
    pub fn controller(&self) -> Controller<'_> {
        self.controller_with(LifecycleConfig::default())
    }

    pub fn controller_with(&self, config: LifecycleConfig) -> Controller<'_> {
        LifecycleController::new(
            Board {
                charger: self.charger.clone(),
                gauge: self.gauge.clone(),
                display: &self.display,
                system: self.system.clone(),
                sleep: self.sleep.clone(),
                retained: self.retained.clone(),
                delay: self.delay.clone(),
            },
            &self.events,
            ModemHandle::new(&self.modem_commands, &self.modem_status),
            config,
            ChargerConfig::default(),
        )
    }

    pub fn display(&self) -> MutexGuard<'_, NoopRawMutex, MockDisplay> {
        match self.display.try_lock() {
            Ok(guard) => guard,
            Err(_) => panic!("display still locked"),
        }
    }

    /// Forget queued modem commands, as if the modem worker had run them
    pub fn drain_modem(&self) {
        while self.modem_commands.try_receive().is_ok() {}
    }

    /// Clear recorded delays
    pub fn reset_delays(&self) {
        self.delay.0.borrow_mut().clear();
    }
}
