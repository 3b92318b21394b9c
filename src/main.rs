use minish::Interpreter;

fn main() {
    let mut shell = Interpreter::default();
    // Every process argument is an extra PATH directory; there are no flags.
    shell.append_path(std::env::args().skip(1));
    if let Err(err) = shell.repl() {
        eprintln!("minish: {err:#}");
        std::process::exit(1);
    }
}
