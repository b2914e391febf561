use std::path::PathBuf;

use zwave_driver::{Driver, DriverOptions};

fn usage() -> ! {
    eprintln!("usage: zwave-cli <port|tcp://host:port> [config-dir]");
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(transport_uri) = args.next() else {
        usage();
    };
    let config_dir = args.next().map(PathBuf::from);

    let builder = DriverOptions::builder().transport_uri(transport_uri);
    let options = match config_dir {
        Some(dir) => builder.config_dir(dir).build(),
        None => builder.build(),
    };

    let driver = Driver::open(options).await?;
    driver.register_watcher(|notification| {
        println!("{notification:?}");
    });

    tokio::signal::ctrl_c().await?;
    driver.close();

    Ok(())
}
