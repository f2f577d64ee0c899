use crate::CLAP_STYLING;
use clap::{arg, command};
use geotrawl_core::pipeline::DEFAULT_IMAGE_ROOT;
use geotrawl_core::store::DEFAULT_STORE_PATH;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("geotrawl")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("geotrawl")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("run")
                .about(
                    "Render every host in the list, download the images it links to and \
                append any GPS coordinates found to the record store.",
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(true)
                        .help("JSON array (or newline-delimited list) of hosts to process"),
                )
                .arg(
                    arg!(-s --"store" <PATH>)
                        .required(false)
                        .help("Path of the JSON record store")
                        .default_value(DEFAULT_STORE_PATH),
                )
                .arg(
                    arg!(-d --"image-dir" <PATH>)
                        .required(false)
                        .help("Directory holding one image folder per processed host")
                        .default_value(DEFAULT_IMAGE_ROOT),
                )
                .arg(
                    arg!(--"timeout" <SECONDS>)
                        .required(false)
                        .help("HTTP request timeout in seconds")
                        .value_parser(clap::value_parser!(u64))
                        .default_value("30"),
                )
                .arg(
                    arg!(--"exiftool" <CMD>)
                        .required(false)
                        .help("exiftool executable used to read GPS tags")
                        .default_value("exiftool"),
                )
                .arg(
                    arg!(--"chrome")
                        .required(false)
                        .help("Render pages in headless Chrome (needs a build with the `chrome` feature)")
                        .action(clap::ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"no-progress")
                        .required(false)
                        .help("Disable the progress spinner")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(
            command!("open")
                .about("Open every map link in the record store in a browser")
                .arg(
                    arg!(-s --"store" <PATH>)
                        .required(false)
                        .help("Path of the JSON record store")
                        .default_value(DEFAULT_STORE_PATH),
                )
                .arg(
                    arg!(--"browser" <CMD>)
                        .required(false)
                        .help("Command used to open a URL (default depends on the platform)"),
                )
                .arg(
                    arg!(--"print")
                        .required(false)
                        .help("Print the links instead of opening them")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
}
