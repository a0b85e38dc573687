// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

mod args;

use args::Args;
use clap::Parser;
use edge_detector::{
    edges::EdgeFilter,
    frame::{packed_len, process_frame, YuvFrame},
    image::FourCC,
};
use serde_json::json;
use std::{error::Error, fs, time::Instant};
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, Layer};

fn init_tracing(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = if args.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let stdout_log = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(level);

    let journald = match tracing_journald::layer() {
        Ok(layer) => Some(layer.with_filter(level)),
        Err(_) => None,
    };

    let tracy = if args.tracy {
        tracy_client::Client::start();
        Some(tracing_tracy::TracyLayer::default().with_filter(level))
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(stdout_log)
        .with(journald)
        .with(tracy);
    tracing::subscriber::set_global_default(subscriber)?;
    tracing_log::LogTracer::init()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(&args)?;

    let (width, height) = (args.size[0], args.size[1]);
    let format: FourCC = args.format.into();
    let filter = EdgeFilter::new(args.sigma, args.thresholds[0], args.thresholds[1])?;

    let mut data = fs::read(&args.input)?;
    let expected = packed_len(width, height, format, args.row_padding)
        .ok_or("frame size overflows")?;
    if data.len() != expected {
        warn!(
            "{} holds {} bytes but a {}x{} {} frame with {} bytes row padding needs {}",
            args.input.display(),
            data.len(),
            width,
            height,
            format,
            args.row_padding,
            expected
        );
    }

    let now = Instant::now();
    let mut frame = YuvFrame::from_packed(&mut data, width, height, format, args.row_padding)?;
    process_frame(&mut frame, !args.disable, &filter)?;
    let elapsed = now.elapsed();

    if let Some(path) = &args.png {
        frame.reassemble()?.save_png(path)?;
        info!("saved preview {}", path.display());
    }

    fs::write(&args.output, &data)?;
    info!(
        "processed {}x{} {} frame in {:.2?}",
        width, height, format, elapsed
    );

    if args.json {
        let summary = json!({
            "input": args.input,
            "output": args.output,
            "width": width,
            "height": height,
            "format": format.to_string(),
            "row_padding": args.row_padding,
            "edges": !args.disable,
            "sigma": filter.sigma,
            "thresholds": [filter.low_threshold, filter.high_threshold],
            "elapsed_us": elapsed.as_micros() as u64,
        });
        println!("{}", summary);
    }

    Ok(())
}
