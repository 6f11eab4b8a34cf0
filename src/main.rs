use lsasm::frontend::command;
use structopt::StructOpt;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    command::run(command::Command::from_args())
}
