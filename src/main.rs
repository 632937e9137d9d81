//! `urkit` binary: encode messages as UR parts and decode them back.

mod cli;

use clap::Parser;
use cli::{Cli, Command, EncodeArgs};
use futures::{StreamExt, stream};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use urkit::{EncoderConfig, Ur, UrDecoder, UrEncoder, stream::decode_stream, stream::paced_parts};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parts and messages go to stdout, so diagnostics must not.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    match Cli::parse().command {
        Command::Encode(args) => encode(args).await,
        Command::Decode => decode().await,
    }
}

async fn encode(args: EncodeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let message = hex::decode(args.hex.trim())?;
    let ur = Ur::from_message(args.ur_type, &message)?;
    let config = EncoderConfig::new(args.max_fragment_len)
        .with_min_fragment_len(args.min_fragment_len)
        .with_first_seq_num(args.first_seq_num);
    let mut encoder = UrEncoder::new(ur, &config)?;
    tracing::info!(
        seq_len = encoder.seq_len(),
        single_part = encoder.is_single_part(),
        "encoding message"
    );

    if let (Some(fps), Some(duration)) = (args.fps, args.duration) {
        let count = usize::try_from(duration)?.saturating_mul(fps.get());
        let mut parts = Box::pin(paced_parts(encoder, fps).take(count));
        while let Some(part) = parts.next().await {
            println!("{}", part?);
        }
        return Ok(());
    }

    let count = args.parts.unwrap_or(encoder.seq_len() as usize);
    for _ in 0..count {
        println!("{}", encoder.next_part()?);
    }
    Ok(())
}

async fn decode() -> Result<(), Box<dyn std::error::Error>> {
    let lines = BufReader::new(io::stdin()).lines();
    let parts = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(err) => {
                log::warn!("stopped reading parts: {err}");
                None
            }
        }
    })
    .filter(|line| futures::future::ready(!line.trim().is_empty()));

    let mut decoder = UrDecoder::new();
    let ur = decode_stream(&mut decoder, parts).await?;
    tracing::info!(
        ur_type = ur.ur_type(),
        parts = decoder.processed_parts_count(),
        "decoded message"
    );
    println!("{}", hex::encode(ur.message()?));
    Ok(())
}
