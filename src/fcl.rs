use argh::FromArgs;

mod cmd_parse;

#[derive(FromArgs)]
/// Parser and evaluator for FHiCL hierarchical configuration documents
struct Args {
    #[argh(subcommand)]
    subcommand: Subcommand,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Subcommand {
    Parse(cmd_parse::Parse),
}

impl Subcommand {
    fn run(self) -> i32 {
        match self {
            Subcommand::Parse(cmd) => cmd.run(),
        }
    }
}

fn main() {
    env_logger::init();
    let args: Args = argh::from_env();
    std::process::exit(args.subcommand.run());
}
