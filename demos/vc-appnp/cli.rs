use std::path::PathBuf;

pub const HELP: &str = "\
APPNP vertex classification

Trains an MLP predictor followed by approximate personalized propagation on
a whole-graph dataset and reports the test accuracy after every epoch. The
backend is selected at compile time via the dev-* cargo features.

USAGE:
    vc-appnp --data-path <PATH> [OPTIONS]

FLAGS:
    -h, --help                  Show this help message and exit
        --profile               Print a per-epoch timing breakdown

OPTIONS:
    -d, --data-path <PATH>      Path to the .npz graph dataset
        --feat-dropout <FLOAT>  Dropout rate on features [default: 0.5]
        --edge-dropout <FLOAT>  Dropout rate on propagation edges [default: 0.5]
        --epochs <INT>          Number of training epochs [default: 200]
        --alpha <FLOAT>         Teleport probability [default: 0.1]
        --k <INT>               Propagation step count [default: 10]
        --num-hidden <INT>      Number of hidden units [default: 64]
        --lr <FLOAT>            Learning rate [default: 0.01]
        --weight-decay <FLOAT>  Weight decay [default: 0.0005]
";

#[derive(Debug)]
pub struct AppArgs {
    pub data_path: PathBuf,
    pub feat_dropout: f64,
    pub edge_dropout: f64,
    pub epochs: usize,
    pub alpha: f64,
    pub k: usize,
    pub num_hidden: usize,
    pub lr: f64,
    pub weight_decay: f64,
    pub profile: bool,
}

impl AppArgs {
    pub fn parse() -> Result<Self, pico_args::Error> {
        let mut pargs = pico_args::Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            println!("{}", HELP);
            std::process::exit(0);
        }

        let args = AppArgs {
            data_path: pargs.value_from_os_str(["-d", "--data-path"], parse_path)?,
            feat_dropout: pargs.opt_value_from_str("--feat-dropout")?.unwrap_or(0.5),
            edge_dropout: pargs.opt_value_from_str("--edge-dropout")?.unwrap_or(0.5),
            epochs: pargs.opt_value_from_str("--epochs")?.unwrap_or(200),
            alpha: pargs.opt_value_from_str("--alpha")?.unwrap_or(0.1),
            k: pargs.opt_value_from_str("--k")?.unwrap_or(10),
            num_hidden: pargs.opt_value_from_str("--num-hidden")?.unwrap_or(64),
            lr: pargs.opt_value_from_str("--lr")?.unwrap_or(1e-2),
            weight_decay: pargs.opt_value_from_str("--weight-decay")?.unwrap_or(5e-4),
            // must parse flags after values
            profile: pargs.contains("--profile"),
        };

        // It's up to the caller what to do with the remaining arguments.
        let remaining = pargs.finish();
        if !remaining.is_empty() {
            panic!("unused arguments: {remaining:?}");
        }

        Ok(args)
    }
}

fn parse_path(s: &std::ffi::OsStr) -> Result<PathBuf, &'static str> {
    Ok(s.into())
}
