//! Produce a presigned download URL for an object.
//!
//! ```shell
//! cargo run --example presign -- bj.bcebos.com my-bucket my-object.txt 1800
//! ```

use std::env;
use std::process::exit;
use std::time::Duration;

use bce_sdk::bos::BosClient;

#[tokio::main]
async fn main() -> bce_sdk::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() < 4 {
        println!("usage: presign <endpoint> <bucket> <key> [expires-secs]");
        exit(1)
    }
    let expires = args
        .get(4)
        .and_then(|v| v.parse().ok())
        .unwrap_or(1800);

    let bos = BosClient::new(bce_sdk::default_client(&args[1])?);
    let url = bos
        .generate_presigned_url(&args[2], &args[3], Duration::from_secs(expires))
        .await?;

    println!("{url}");
    Ok(())
}
