use std::process::ExitCode;

use xmlsignal::{dictionary_from_source, parse_buffer, ParseOptions, Source};

const USAGE: &str = "usage: xmlsignal <file.xml> [--events] [--exclude NAME]...";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::init();

    let mut path = None;
    let mut events = false;
    let mut excluded = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--events" => events = true,
            "--exclude" => match args.next() {
                Some(name) => excluded.push(name),
                None => {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                }
            },
            _ if path.is_none() => path = Some(arg),
            _ => {
                eprintln!("{USAGE}");
                return ExitCode::FAILURE;
            }
        }
    }
    let Some(path) = path else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };

    if events {
        let bytes = match Source::path(&path).load().await {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        };
        for event in parse_buffer(bytes.as_slice()) {
            match event {
                Ok(event) => println!("{event:?}"),
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            }
        }
        return ExitCode::SUCCESS;
    }

    let include = |name: &str| !excluded.iter().any(|e| e == name);
    match dictionary_from_source(Source::path(&path), ParseOptions::default(), include).await {
        Ok(tree) => {
            println!("{tree:#?}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
