use clap::{Parser, Subcommand};
use quill_cli::commands::{cmd_lex, cmd_parse, read_source, LexFormat, ParseFormat};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Quill front end: tokenize and parse Quill source")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenize a source file and list the tokens
    Lex {
        /// Path to .ql source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = LexFormat::Pretty)]
        format: LexFormat,
    },

    /// Parse a source file and dump the AST
    Parse {
        /// Path to .ql source file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = ParseFormat::Pretty)]
        format: ParseFormat,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    quill_cli::init_logging();
    let cli = Cli::parse();

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    let accepted = match cli.command {
        Commands::Lex { file, format } => {
            info!(file = %file, "tokenizing");
            let src = read_source(&file)?;
            cmd_lex(&src, format, &mut out, &mut err)?
        }
        Commands::Parse { file, format } => {
            info!(file = %file, "parsing");
            let src = read_source(&file)?;
            cmd_parse(&src, format, &mut out, &mut err)?
        }
    };

    if !accepted {
        error!("source rejected");
        std::process::exit(1);
    }
    Ok(())
}
