use clap::Parser;
use hr2h5::{HrModel, write_h5};
use log::info;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

/// Convert a Wannier90 hr.dat tight-binding model into an HDF5 container.
#[derive(Parser, Debug)]
#[command(name = "hr2h5", version, about)]
struct Cli {
    /// Path of the hr.dat file to convert.
    hr_file: PathBuf,
    /// Path of the HDF5 container to create.
    h5_file: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> hr2h5::Result<()> {
    info!("tight-binding model data: {}", cli.hr_file.display());
    info!("HDF5 output             : {}", cli.h5_file.display());

    let started = Instant::now();
    let model = HrModel::from_hr(&cli.hr_file)?;
    info!("number of Wannier orbitals: {}", model.num_wann);
    info!("number of R vectors       : {}", model.nrvecs);
    info!("model data in memory      : {} bytes", model.hopping_bytes());
    info!(
        "hr file read in {:.3} s",
        started.elapsed().as_secs_f64()
    );

    write_h5(&model, &cli.h5_file)?;
    info!("wrote HDF5 container {}", cli.h5_file.display());
    Ok(())
}
