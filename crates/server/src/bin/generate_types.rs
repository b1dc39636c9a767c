use std::{env, fs, path::PathBuf};

use db::models::{
    task::{CreateTask, Task, UpdateTask},
    todo::{CreateTodo, Todo, UpdateTodo},
};
use services::services::config::Config;
use ts_rs::TS;
use utils::response::ApiResponse;

fn generate_types_content() -> String {
    let decls = [
        Task::decl(),
        CreateTask::decl(),
        UpdateTask::decl(),
        Todo::decl(),
        CreateTodo::decl(),
        UpdateTodo::decl(),
        ApiResponse::<()>::decl(),
        Config::decl(),
    ];

    let body = decls
        .iter()
        .map(|decl| format!("export {}", decl.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "// This file was generated by `generate_types`. Do not edit this file manually.\n\n{}\n",
        body
    )
}

fn main() -> std::io::Result<()> {
    let check_mode = env::args().any(|arg| arg == "--check");
    let output = env::var("TYPES_OUT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("shared/types.ts"));

    let content = generate_types_content();

    if check_mode {
        let current = fs::read_to_string(&output).unwrap_or_default();
        if current == content {
            println!("{} is up to date.", output.display());
            return Ok(());
        }
        eprintln!("{} is out of date. Run `cargo run --bin generate_types`.", output.display());
        std::process::exit(1);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, content)?;
    println!("TypeScript types written to {}", output.display());
    Ok(())
}
