//! Lifecycle worker

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use vigil_core::traits::{Charger, Gauge, StatusDisplay, System};
use vigil_hal::{RetainedMemory, SleepControl};

use crate::controller::{BootOutcome, LifecycleController};
use crate::fmt::*;

/// Boot the board, then serve events until it powers off
///
/// Returns only when the board halted or went to deep sleep waiting for a
/// battery.
pub async fn lifecycle_task<M, C, G, D, S, P, R, L>(
    mut controller: LifecycleController<'_, M, C, G, D, S, P, R, L>,
) -> BootOutcome
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
    info!("Lifecycle task started");

    match controller.boot().await {
        BootOutcome::Ready => {
            controller.run().await;
            info!("Lifecycle task stopped in {:?}", controller.state());
            BootOutcome::Halted
        }
        outcome => {
            info!("Boot ended: {:?}", outcome);
            outcome
        }
    }
}
