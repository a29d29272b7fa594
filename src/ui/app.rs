use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{client::Client, config::ClientConfig};

use super::util::handler::EventHandler;

pub struct App {
    pub client: Client,
    pub config: ClientConfig,
    pub should_quit: bool,
}

impl App {
    pub async fn new(config: ClientConfig) -> color_eyre::Result<Self> {
        let client = Client::from_config(&config)?;

        Ok(Self {
            client,
            config,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let outcome = self.client.boot().await;
        EventHandler::print_outcome(&outcome);
        self.client.start_background(self.config.autosave);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let client = &self.client;

        while !self.should_quit {
            tokio::select! {
                line = lines.next_line() => match line? {
                    Some(line) => self.should_quit = !EventHandler::handle_line(client, &line).await,
                    None => self.should_quit = true,
                },
                Ok(command) = client.commands().recv_async() => {
                    client.controller().dispatch(command).await;
                }
                Ok(evt) = client.events().recv_async() => EventHandler::handle_event(evt),
            }
        }

        self.client.shutdown();
        Ok(())
    }
}
