use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::StreamExt;
use log::{debug, error, info};
use paho_mqtt as mqtt;
use tokio::sync::Mutex;
use tokio::task;
use tokio::time::{self, interval};
use xiaomi::Device;
use yeelight::{ClimateAdapter, LightAdapter, Registry};

use yuba::{topic, Action, Config, Gateway, Publication, Result};

const SCAN_INTERVAL: Duration = Duration::from_secs(15);
const SETUP_RETRY_INTERVAL: Duration = Duration::from_secs(20);

type YubaGateway = Gateway<Device>;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    let config = Config::from_env()?;

    info!(
        "Initializing with host {} (token {}...)",
        config.host,
        config.token_hint()
    );

    let climate = until_ready("climate", || {
        ClimateAdapter::setup(
            Device::new(config.host, config.token),
            config.adapter_config(),
        )
    })
    .await;

    let light = until_ready("light", || {
        LightAdapter::setup(
            Device::new(config.host, config.token),
            config.adapter_config(),
        )
    })
    .await;

    let mut climates = Registry::new();
    climates.insert(config.host, Mutex::new(climate));

    let mut lights = Registry::new();
    lights.insert(config.host, Mutex::new(light));

    let gateway = Arc::new(Gateway::new(climates, lights));

    let mqtt_client = connect_mqtt(config.mqtt_address.clone()).await?;
    info!("connected mqtt");

    for publication in gateway.attributes().await {
        publish(&mqtt_client, publication).await;
    }

    let (actions_handle, state_handle) = tokio::try_join!(
        task::spawn(subscribe_actions(mqtt_client.clone(), gateway.clone())),
        task::spawn(subscribe_state(mqtt_client, gateway))
    )?;

    actions_handle?;
    state_handle?;

    Ok(())
}

async fn until_ready<A, F, Fut>(platform: &str, mut setup: F) -> A
where
    F: FnMut() -> Fut,
    Fut: Future<Output = yeelight::Result<A>>,
{
    loop {
        match setup().await {
            Ok(adapter) => return adapter,
            Err(err) => {
                error!("unable to set up {}: {}", platform, err);
                time::sleep(SETUP_RETRY_INTERVAL).await;
            }
        }
    }
}

async fn connect_mqtt(address: String) -> Result<mqtt::AsyncClient> {
    let client = mqtt::AsyncClient::new(address)?;

    let conn_opts = mqtt::ConnectOptionsBuilder::new_v3()
        .keep_alive_interval(Duration::from_secs(30))
        .clean_session(false)
        .finalize();

    client.connect(conn_opts).await?;

    Ok(client)
}

async fn subscribe_actions(mut mqtt: mqtt::AsyncClient, gateway: Arc<YubaGateway>) -> Result<()> {
    let mut stream = mqtt.get_stream(None);

    let filters = topic::action_filters();
    mqtt.subscribe_many(&filters, &[mqtt::QOS_1; 2]);

    info!("Subscribed to topics: {:?}", filters);

    while let Some(msg_opt) = stream.next().await {
        if let Some(msg) = msg_opt {
            let (host, action) = match Action::parse(msg.topic(), msg.payload()) {
                Ok(parsed) => parsed,
                Err(err) => {
                    error!("Error parsing action: {}", err);
                    continue;
                }
            };

            match gateway.perform(host, action).await {
                Ok(Some(publication)) => publish(&mqtt, publication).await,
                Ok(None) => (),
                Err(err) => error!("Error performing action: {}", err),
            }
        } else {
            error!("Lost MQTT connection. Attempting reconnect.");
            while let Err(err) = mqtt.reconnect().await {
                error!("Error MQTT reconnecting: {}", err);
                time::sleep(Duration::from_millis(1000)).await;
            }
        }
    }

    Ok(())
}

async fn subscribe_state(mqtt: mqtt::AsyncClient, gateway: Arc<YubaGateway>) -> Result<()> {
    let mut timer = interval(SCAN_INTERVAL);

    loop {
        timer.tick().await;

        for publication in gateway.refresh().await {
            publish(&mqtt, publication).await;
        }
    }
}

async fn publish(mqtt: &mqtt::AsyncClient, publication: Publication) {
    debug!("publishing to {}", publication.topic);

    let message = mqtt::MessageBuilder::new()
        .topic(publication.topic)
        .payload(publication.payload)
        .retained(true)
        .finalize();

    if let Err(err) = mqtt.publish(message).await {
        error!("Error publishing: {}", err);
    }
}
