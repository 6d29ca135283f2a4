use clap::Parser;

fn main() {
    use kagi::util::cli::*;

    dotenv::dotenv().ok();

    let opts = Options::parse();
    match run_cli_action(opts) {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
            println!("OK!");
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
