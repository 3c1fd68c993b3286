//! Basic usage example for duckwire framing and relay gating.

use duck_dedup::BloomOracle;
use duck_wire::{prepare_for_relaying, topics, DeviceId, DuckType, FrameBuilder, RelayDecision};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== duckwire framing example ===\n");

    let mut oracle = BloomOracle::with_default_config();
    let mut builder = FrameBuilder::new(DeviceId([0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08]));

    // 1. Build an outbound frame
    println!("1. Building a sensor frame...");
    let frame = builder.build(
        &mut oracle,
        DeviceId::BROADCAST,
        DuckType::Detector,
        topics::SENSOR,
        b"temp=21.5",
    )?;
    println!("   frame: {} bytes, muid {}", frame.len(), frame.muid());

    // 2. Our own frame is recognized as already seen
    println!("\n2. Gating our own frame for relay...");
    let wire_bytes = frame.into_bytes();
    match prepare_for_relaying(&mut oracle, &wire_bytes)? {
        RelayDecision::Duplicate => println!("   duplicate, dropped (as expected)"),
        RelayDecision::Forward(_) => println!("   unexpectedly forwarded"),
    }

    // 3. A frame from another node gets relayed
    println!("\n3. Gating a foreign frame...");
    let mut foreign_oracle = BloomOracle::with_default_config();
    let mut neighbor = FrameBuilder::new(DeviceId([0xAA; 8]));
    let foreign = neighbor.build(
        &mut foreign_oracle,
        DeviceId::BROADCAST,
        DuckType::Mama,
        topics::STATUS,
        b"online",
    )?;

    match prepare_for_relaying(&mut oracle, foreign.as_bytes())? {
        RelayDecision::Forward(mut relayed) => {
            println!("   forwarding, hop count now {}", relayed.hop_count());

            // 4. Tag the reception with radio-quality metrics
            relayed.add_metrics(-92, 6.75)?;
            println!(
                "   with metrics trailer: {} bytes, crc {:#010x}",
                relayed.len(),
                relayed.data_crc()
            );
        }
        RelayDecision::Duplicate => println!("   unexpectedly dropped"),
    }

    println!("\n=== example completed ===");
    Ok(())
}
