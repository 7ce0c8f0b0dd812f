use book_volume_rust::config;
use book_volume_rust::parse_option;
use book_volume_rust::provider::query::{Keyword, SearchQuery};
use book_volume_rust::provider::volumes::{Client, OptionValue, Options};
use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "volumes", about = "Google Books volume lookup and search")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Retrieve a single volume by ID.
    Get {
        id: String,

        /// Optional parameter as key=value (partner, projection, source).
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, OptionValue)>,
    },

    /// Full-text volume search.
    Search {
        #[arg(default_value = "")]
        terms: String,

        #[command(flatten)]
        scoped: Scoped,

        /// Optional parameter as key=value (maxResults, orderBy, startIndex, ...).
        #[arg(short = 'o', long = "option", value_parser = parse_option)]
        options: Vec<(String, OptionValue)>,
    },
}

#[derive(Args)]
struct Scoped {
    #[arg(long)]
    intitle: Option<String>,
    #[arg(long)]
    inauthor: Option<String>,
    #[arg(long)]
    inpublisher: Option<String>,
    #[arg(long)]
    subject: Option<String>,
    #[arg(long)]
    isbn: Option<String>,
    #[arg(long)]
    lccn: Option<String>,
    #[arg(long)]
    oclc: Option<String>,
}

impl Scoped {
    fn apply(self, mut query: SearchQuery) -> SearchQuery {
        let scoped = [
            (Keyword::InTitle, self.intitle),
            (Keyword::InAuthor, self.inauthor),
            (Keyword::InPublisher, self.inpublisher),
            (Keyword::Subject, self.subject),
            (Keyword::Isbn, self.isbn),
            (Keyword::Lccn, self.lccn),
            (Keyword::Oclc, self.oclc),
        ];
        for (keyword, value) in scoped {
            if let Some(value) = value {
                query = query.with(keyword, value);
            }
        }
        query
    }
}

fn main() -> ExitCode {
    config::load_dotenv();
    let cli = Cli::parse();

    let app_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Cannot loading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let _guard = match config::log::set_global_logging_config(app_config.logger()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match Client::from_config(app_config.api()) {
        Ok(client) => client,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&client, cli.command) {
        Ok(body) => {
            match serde_json::to_string_pretty(&body) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    error!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(client: &Client, command: Command) -> Result<Map<String, Value>, book_volume_rust::provider::ClientError> {
    match command {
        Command::Get { id, options } => {
            info!("volume 조회: {}", id);
            client.fetch_volume(&id, &options.into_iter().collect::<Options>())
        }
        Command::Search { terms, scoped, options } => {
            let query = scoped.apply(SearchQuery::new(terms)).to_string();
            info!("volume 검색: {}", query);
            client.search_volumes(&query, &options.into_iter().collect::<Options>())
        }
    }
}
