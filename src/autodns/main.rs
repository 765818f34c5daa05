//! The pipe co-process PowerDNS launches: load the configuration, check the
//! backends, then serve the line protocol over stdin/stdout until EOF.

use autodns::config::Config;
use autodns::pdns::Pdns;
use clap::{App, Arg};
use std::io;
use std::path::Path;
use std::process;

fn main() {
    env_logger::init();

    let matches = App::new("autodns")
        .about("PowerDNS pipe backend synthesizing DNS answers from IP addresses")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .takes_value(true)
                .value_name("FILE")
                .default_value("testdata/dns.yaml")
                .help("configuration file"),
        )
        .get_matches();

    let filename = matches.value_of("config").unwrap_or("testdata/dns.yaml");

    let backends = match Config::load(Path::new(filename)).and_then(|c| c.backends()) {
        Ok(backends) => backends,
        Err(e) => {
            eprintln!("error parsing {:?}: {}", filename, e);
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let pdns = Pdns::new(backends);

    if let Err(e) = pdns.serve(stdin.lock(), stdout.lock()) {
        eprintln!("reading requests failed: {}", e);
        process::exit(1);
    }
}
