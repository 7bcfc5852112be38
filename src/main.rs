// sass-modules - stylesheet modules for the bundle host
// Entry point with clean separation of concerns

use sass_modules::cli::CliHandler;
use sass_modules::utils::{Logger, SassModulesError};

#[tokio::main]
async fn main() {
    let handler = CliHandler::new();

    if let Err(e) = handler.run().await {
        match e.downcast_ref::<SassModulesError>() {
            Some(err) => Logger::error(&err.format_detailed()),
            None => Logger::error(&format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}
