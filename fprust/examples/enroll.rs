//! Enroll a finger into the first free library page
//!
//! Captures two images of the same finger, combines them into a template
//! model and stores it.

use std::time::Duration;

use fprust::{CharBuffer, Confirmation, Device, Error};
use tokio::time::sleep;

async fn capture(device: &mut Device, buffer: CharBuffer) -> fprust::Result<()> {
    println!("Place finger on sensor...");
    loop {
        match device.generate_image().await {
            Ok(()) => break,
            Err(Error::Device(Confirmation::NoFinger)) => {
                sleep(Duration::from_millis(200)).await;
            }
            Err(e) => return Err(e),
        }
    }
    device.image_to_template(buffer).await?;
    println!("Captured into {buffer}");
    Ok(())
}

#[tokio::main]
async fn main() -> fprust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut device = Device::open(0, 57600)?;
    device.connect().await?;

    capture(&mut device, CharBuffer::One).await?;
    println!("Lift finger and place it again...");
    sleep(Duration::from_secs(1)).await;
    capture(&mut device, CharBuffer::Two).await?;

    let score = device.match_templates().await?;
    println!("Capture consistency score: {score}");

    device.register_model().await?;

    let page = device.template_count().await?;
    device.store(CharBuffer::One, page).await?;
    println!("Stored template at page {page}");

    device.disconnect().await?;

    Ok(())
}
