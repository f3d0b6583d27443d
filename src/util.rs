use serenity::all::*;
use std::future::Future;

pub fn get_value<'a>(
    options: &'a [CommandDataOption],
    name: &'a str,
) -> Option<&'a CommandDataOptionValue> {
    options.iter().find(|v| v.name == name).map(|v| &v.value)
}

pub fn value_to_string(v: &CommandDataOptionValue) -> Option<String> {
    match v {
        CommandDataOptionValue::String(v) => Some(v.clone()),
        _ => None,
    }
}

pub fn value_to_bool(v: &CommandDataOptionValue) -> Option<bool> {
    match v {
        CommandDataOptionValue::Boolean(v) => Some(*v),
        _ => None,
    }
}

/// Runs the [body] and reports the error to the user if one occurs.
///
/// Edits the interaction response if there is one, otherwise creates it.
pub async fn run_and_report_error(
    cmd: &CommandInteraction,
    http: &Http,
    body: impl Future<Output = anyhow::Result<()>>,
) {
    let Err(err) = body.await else {
        return;
    };
    tracing::error!("command `{}` failed: {err:#}", cmd.data.name);

    let message = format!("Error: {err}");
    let reported = if cmd.get_response(http).await.is_ok() {
        cmd.edit_response(http, EditInteractionResponse::new().content(message))
            .await
            .map(|_| ())
    } else {
        cmd.create_response(
            http,
            CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(message)
                    .ephemeral(true),
            ),
        )
        .await
    };
    if let Err(err) = reported {
        tracing::error!("failed to report error to the user: {err}");
    }
}

/// A throwaway HTTP server answering with canned responses, for tests that need a real socket.
#[cfg(test)]
pub mod testing {
    use tokio::{
        io::{AsyncReadExt as _, AsyncWriteExt as _},
        net::TcpListener,
    };

    #[derive(Clone)]
    pub struct Route {
        pub path: &'static str,
        pub status: u16,
        pub content_type: &'static str,
        pub body: Vec<u8>,
    }
    impl Route {
        pub fn new(
            path: &'static str,
            status: u16,
            content_type: &'static str,
            body: impl Into<Vec<u8>>,
        ) -> Self {
            Self {
                path,
                status,
                content_type,
                body: body.into(),
            }
        }
    }

    /// Serves `routes` by request path (query ignored) and returns the base URL.
    /// Unknown paths get a 404.
    pub async fn serve(routes: Vec<Route>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0; 8192];
                    let mut read = 0;
                    while read < buf.len() {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        if n == 0 {
                            break;
                        }
                        read += n;
                        if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let target = request.split_whitespace().nth(1).unwrap_or("/");
                    let path = target.split('?').next().unwrap_or(target);
                    let route = routes
                        .into_iter()
                        .find(|r| r.path == path)
                        .unwrap_or_else(|| Route::new("", 404, "text/plain", "not found"));

                    let head = format!(
                        "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        route.status,
                        route.content_type,
                        route.body.len()
                    );
                    socket.write_all(head.as_bytes()).await.ok();
                    socket.write_all(&route.body).await.ok();
                    socket.shutdown().await.ok();
                });
            }
        });

        format!("http://{addr}")
    }
}
