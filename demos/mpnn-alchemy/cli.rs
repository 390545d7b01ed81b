use std::path::PathBuf;

pub const HELP: &str = "\
MPNN graph regression

Trains a message passing network on preprocessed Alchemy molecules
(train.jsonl / valid.jsonl under the dataset root) and reports the
validation MAE after every epoch, stopping early once it stalls. The
backend is selected at compile time via the dev-* cargo features.

USAGE:
    mpnn-alchemy --data-path <DIR> [OPTIONS]

FLAGS:
    -h, --help                  Show this help message and exit
        --profile               Print a per-epoch timing breakdown

OPTIONS:
    -d, --data-path <DIR>       Dataset root directory
        --epochs <INT>          Number of training epochs [default: 250]
        --batch-size <INT>      Molecules per mini-batch [default: 64]
        --node-out-feats <INT>  Node embedding width [default: 64]
        --edge-hidden-feats <INT>
                                Edge network hidden width [default: 128]
        --n-tasks <INT>         Number of regression targets [default: 12]
        --lr <FLOAT>            Learning rate [default: 0.0001]
        --patience <INT>        Stalled epochs before early stop [default: 50]
        --weight-decay <FLOAT>  Weight decay [default: 0]
        --data-size <INT>       Cap on training molecules [default: 35000]
";

#[derive(Debug)]
pub struct AppArgs {
    pub data_path: PathBuf,
    pub epochs: usize,
    pub batch_size: usize,
    pub node_out_feats: usize,
    pub edge_hidden_feats: usize,
    pub n_tasks: usize,
    pub lr: f64,
    pub patience: usize,
    pub weight_decay: f64,
    pub data_size: usize,
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
            epochs: pargs.opt_value_from_str("--epochs")?.unwrap_or(250),
            batch_size: pargs.opt_value_from_str("--batch-size")?.unwrap_or(64),
            node_out_feats: pargs.opt_value_from_str("--node-out-feats")?.unwrap_or(64),
            edge_hidden_feats: pargs
                .opt_value_from_str("--edge-hidden-feats")?
                .unwrap_or(128),
            n_tasks: pargs.opt_value_from_str("--n-tasks")?.unwrap_or(12),
            lr: pargs.opt_value_from_str("--lr")?.unwrap_or(1e-4),
            patience: pargs.opt_value_from_str("--patience")?.unwrap_or(50),
            weight_decay: pargs.opt_value_from_str("--weight-decay")?.unwrap_or(0.0),
            data_size: pargs.opt_value_from_str("--data-size")?.unwrap_or(35000),
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
