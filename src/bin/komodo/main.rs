use anyhow::Result;
use env_logger::{Builder, Env};

use komodo::KomodoConfig;

mod cli;
mod util;
mod cmd_xhi_evo;
mod cmd_snaplist;
mod cmd_gitref;
mod cmd_newrun;
mod cmd_select_snaps;
mod cmd_galaxy_props;

fn init_logger() {
    // RUST_LOG overrides; default keeps only warnings and errors.
    Builder::from_env(Env::default().default_filter_or("warn"))
        .format_timestamp_millis()
        .init();
}

fn main() {
    init_logger();

    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = cli::Cli::parse();

    let mut cfg = KomodoConfig::from_env();
    if cli.verbose {
        cfg = cfg.with_quiet(false);
    }
    if cli.little_h.is_some() {
        cfg = cfg.with_little_h(cli.little_h);
    }

    match cli.cmd {
        cli::Cmd::XhiEvo { fname, weight, json } =>
            cmd_xhi_evo::exec(fname, weight, json, &cfg),

        cli::Cmd::Snaplist { fname, json } =>
            cmd_snaplist::exec(fname, json, &cfg),

        cli::Cmd::Gitref { fname } =>
            cmd_gitref::exec(fname),

        cli::Cmd::Newrun { direc, exec_only } =>
            cmd_newrun::exec(direc, exec_only, &cfg),

        cli::Cmd::SelectSnaps { z, snaplist, alist, json } => {
            // --alist wins over KOMODO_ALIST
            if alist.is_some() {
                cfg = cfg.with_alist(alist);
            }
            cmd_select_snaps::exec(z, snaplist, json, &cfg)
        }

        cli::Cmd::GalaxyProps { fname, json } =>
            cmd_galaxy_props::exec(fname, json, &cfg),
    }
}
