use clap::Parser;
use miette::Result;
use orca::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;
    orca::logging::init_tracing(global.verbose, global.quiet);

    match cli.command {
        Commands::Calc(args) => orca::cli::commands::calc::run(args, &global),
        Commands::Form(args) => orca::cli::commands::form::run(args, &global),
        Commands::Budget(cmd) => orca::cli::commands::budget::run(cmd, &global),
        Commands::Rate(args) => orca::cli::commands::rate::run(args, &global),
        Commands::Config(cmd) => orca::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => orca::cli::commands::completions::run(args),
    }
}
