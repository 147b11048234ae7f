//! Modem worker

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;
use vigil_drivers::modem::ModemPowerSequencer;

use crate::channels::ModemChannel;
use crate::fmt::*;

/// Run queued PWRKEY sequences one at a time
pub async fn modem_task<M, P, D>(
    commands: &ModemChannel<M>,
    mut sequencer: ModemPowerSequencer<'_, P, D>,
) -> !
where
    M: RawMutex,
    P: OutputPin,
    D: DelayNs,
{
    info!("Modem task started");

    loop {
        let command = commands.receive().await;
        debug!("modem command: {:?}", command);
        // Failures are logged by the sequencer; the next command retries
        let _ = sequencer.execute(command).await;
    }
}
