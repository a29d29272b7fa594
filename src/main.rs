use tunewire::{
    config::ClientConfig,
    ui::app::App,
    util::{hook::set_panic_hook, log::initialize_logging},
};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> color_eyre::Result<()> {
    let config = setup()?;

    let mut app = App::new(config).await?;
    app.run().await
}

fn setup() -> color_eyre::Result<ClientConfig> {
    color_eyre::install()?;
    dotenv::dotenv().ok();
    set_panic_hook();
    let config = ClientConfig::from_env()?;
    initialize_logging(&config.data_dir, &config.log_filter)?;
    Ok(config)
}
