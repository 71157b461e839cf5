// Keyboard command sender: type headings like a serial terminal
//   0-9 and SPACE  -> heading digits and delimiter
//   * or ENTER     -> start the program
//   P              -> run the demo path
//   Q / ESC        -> quit
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use roverc_runtime::config::{TOPIC_CMD_DEMO, TOPIC_CMD_TEXT};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let pub_text = session.declare_publisher(TOPIC_CMD_TEXT).await?;
    let pub_demo = session.declare_publisher(TOPIC_CMD_DEMO).await?;

    info!("Controls: digits+SPACE=headings, */ENTER=start, P=demo, Q=quit");
    info!("Example: 0 90 180 270*  (a square)");

    enable_raw_mode()?;
    let result = run_sender(&pub_text, &pub_demo).await;
    disable_raw_mode()?;

    result
}

async fn run_sender(
    pub_text: &zenoh::pubsub::Publisher<'_>,
    pub_demo: &zenoh::pubsub::Publisher<'_>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    loop {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
            continue;
        };
        if kind != KeyEventKind::Press {
            continue;
        }

        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || c == ' ' || c == '*' => {
                pub_text.put(c.to_string()).await?;
            }
            KeyCode::Enter => {
                pub_text.put("*").await?;
                info!("Start sent");
            }
            KeyCode::Char('p') => {
                pub_demo.put("demo").await?;
                info!("Demo requested");
            }
            KeyCode::Char('q') | KeyCode::Esc => break,
            _ => {}
        }
    }

    Ok(())
}
