use anyhow::Result;
use nordplug::handler::handler;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let outcome = handler(serde_json::Value::Null).await;

    let result = match outcome {
        Ok(o) => {
            info!(
                "Invocation {} complete: device {} switched {} at hour {} (price {:.2})",
                o.invocation_id, o.device_id, o.command, o.hour, o.price
            );
            Ok(())
        }
        Err(e) => {
            error!("Invocation failed: {}", e);
            Err(anyhow::anyhow!("Invocation failed: {}", e))
        }
    };

    // Flush file logs before exit
    nordplug::logging::shutdown();
    result
}
