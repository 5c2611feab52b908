use clap::Parser;
use emx_figure::{Cli, Command, EnvOverrides};

fn main() -> emx_figure::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let env = EnvOverrides::from_env();

    match cli.command {
        Command::Convert {
            ref note,
            ref output,
            in_place_paths,
            ref fig_folder,
            lookahead,
            dry_run,
            json,
        } => cmd::convert::run(
            &cli,
            &env,
            cmd::convert::ConvertArgs {
                note,
                output: output.as_deref(),
                in_place_paths,
                fig_folder: fig_folder.clone(),
                lookahead,
                dry_run,
                json,
            },
        ),
        Command::Resolve { ref name } => cmd::resolve::run(&cli, &env, name),
        Command::NextFolder { ref root, ref pattern } => {
            cmd::next_folder::run(root.as_deref(), pattern)
        }
    }
}

mod cmd {
    pub mod convert;
    pub mod next_folder;
    pub mod resolve;
}
