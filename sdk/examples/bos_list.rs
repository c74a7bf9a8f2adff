//! List buckets, then the objects in one of them.
//!
//! ```shell
//! export BCE_ACCESS_KEY_ID=...
//! export BCE_SECRET_ACCESS_KEY=...
//! cargo run --example bos_list -- bj.bcebos.com my-bucket
//! ```

use std::env;
use std::process::exit;

use bce_sdk::bos::{BosClient, ListObjectsRequest};
use log::debug;

#[tokio::main]
async fn main() -> bce_sdk::Result<()> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() < 2 {
        println!("usage: bos_list <endpoint> [bucket]");
        exit(1)
    }

    let bos = BosClient::new(bce_sdk::default_client(&args[1])?);

    let listing = bos.list_buckets().await?;
    debug!("request served by account {}", listing.owner.id);
    for bucket in &listing.buckets {
        println!("{} ({}, created {})", bucket.name, bucket.location, bucket.creation_date);
    }

    if let Some(bucket) = args.get(2) {
        let mut request = ListObjectsRequest::new();
        loop {
            let page = bos.list_objects(bucket, request.clone()).await?;
            for object in &page.contents {
                println!("  {} ({} bytes)", object.key, object.size);
            }
            match page.next_marker.filter(|_| page.is_truncated) {
                Some(marker) => request = request.with_marker(marker),
                None => break,
            }
        }
    }

    Ok(())
}
