//! Read and print the module's system parameters

use fprust::Device;

#[tokio::main]
async fn main() -> fprust::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port: u8 = std::env::var("FP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);

    let mut device = Device::open(port, 57600)?;
    device.connect().await?;

    let params = device.read_system_parameters().await?;
    println!("{params}");

    let count = device.template_count().await?;
    println!("Templates stored: {count}");

    device.disconnect().await?;

    Ok(())
}
