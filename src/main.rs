use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use devcorner::browse::{run, Command, Options};
use devcorner::query::SortOption;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let sort_names: Vec<&str> = SortOption::ALL.iter().map(|o| o.name()).collect();
    let matches = App::new("devcorner")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Browse the Developer's Corner blog from the terminal")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .takes_value(true)
                .global(true)
                .help("Configuration file (default: nearest devcorner.yaml)"),
        )
        .arg(
            Arg::with_name("posts")
                .long("posts")
                .value_name("DIR")
                .takes_value(true)
                .global(true)
                .help("Load posts from DIR instead of the configured source"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .global(true)
                .help("Log debug output to stderr"),
        )
        .subcommand(
            SubCommand::with_name("list")
                .about("List posts matching a search and tag filter")
                .arg(
                    Arg::with_name("search")
                        .short("s")
                        .long("search")
                        .value_name("TERM")
                        .takes_value(true)
                        .help("Match TERM in titles, excerpts, and content"),
                )
                .arg(
                    Arg::with_name("tag")
                        .short("t")
                        .long("tag")
                        .value_name("TAG")
                        .takes_value(true)
                        .multiple(true)
                        .number_of_values(1)
                        .help("Only show posts tagged TAG (repeatable; any tag matches)"),
                )
                .arg(
                    Arg::with_name("sort")
                        .long("sort")
                        .value_name("ORDER")
                        .takes_value(true)
                        .possible_values(&sort_names)
                        .default_value(SortOption::NewestFirst.name()),
                )
                .arg(
                    Arg::with_name("all-tags")
                        .long("all-tags")
                        .help("Show every tag in the tag bar"),
                ),
        )
        .subcommand(SubCommand::with_name("tags").about("List every tag"))
        .subcommand(
            SubCommand::with_name("show")
                .about("Read a post")
                .arg(
                    Arg::with_name("post")
                        .value_name("ID_OR_SLUG")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("html")
                        .long("html")
                        .help("Render the post as an HTML article"),
                ),
        )
        .get_matches();

    let (name, sub) = matches.subcommand();
    let sub = match sub {
        Some(sub) => sub,
        None => std::process::exit(2),
    };

    init_logging(flag(&matches, sub, "verbose"));

    let options = Options {
        config_file: value(&matches, sub, "config").map(PathBuf::from),
        posts_directory: value(&matches, sub, "posts").map(PathBuf::from),
    };
    let command = match name {
        "list" => Command::List {
            search: sub.value_of("search").map(String::from),
            tags: sub
                .values_of("tag")
                .map(|tags| tags.map(String::from).collect())
                .unwrap_or_default(),
            sort: match sub.value_of("sort").unwrap_or_default().parse() {
                Ok(sort) => sort,
                Err(err) => {
                    eprintln!("error: {}", err);
                    std::process::exit(2);
                }
            },
            expand_tags: sub.is_present("all-tags"),
        },
        "tags" => Command::Tags,
        "show" => Command::Show {
            post: sub.value_of("post").unwrap_or_default().to_owned(),
            html: sub.is_present("html"),
        },
        _ => std::process::exit(2),
    };

    let stdout = std::io::stdout();
    if let Err(err) = run(&options, &command, &mut stdout.lock()) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

// Global args may land on either level of the matches.
fn value<'a>(top: &'a ArgMatches, sub: &'a ArgMatches, name: &str) -> Option<&'a str> {
    sub.value_of(name).or_else(|| top.value_of(name))
}

fn flag(top: &ArgMatches, sub: &ArgMatches, name: &str) -> bool {
    sub.is_present(name) || top.is_present(name)
}

fn init_logging(verbose: bool) {
    let default = match verbose {
        true => "devcorner=debug",
        false => "devcorner=warn",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
