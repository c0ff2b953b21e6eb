//! GPIO edge watcher tasks
//!
//! One task per input pin. The await wakes from the GPIO interrupt and
//! the handoff to the polling loop is a single atomic store, so this
//! layer does no other work.

use defmt::*;
use embassy_rp::gpio::Input;

use autograph_core::input::InputChannel;

use crate::channels::EDGE_LATCH;

/// Latch rising edges of `pin` into the shared edge latch
#[embassy_executor::task(pool_size = 3)]
pub async fn edge_watcher(mut pin: Input<'static>, channel: InputChannel) {
    info!("edge watcher started: {}", channel);

    loop {
        pin.wait_for_rising_edge().await;
        EDGE_LATCH.raise(channel);
    }
}
