mod app;
mod builder;
mod forge_core;
mod model;
mod runtime;
mod services;
mod theme;
mod ui;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    ui::run()
}
