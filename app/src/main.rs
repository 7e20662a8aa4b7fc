//! Line-oriented terminal front end for the inventory session.
//!
//! # Design
//! The host side of the host-does-IO split: reads commands from stdin,
//! executes the session's pending requests over real HTTP with ureq, and
//! redraws the table and form after every command. A mutation's request
//! chain (the write, then the unconditional list reload) runs to completion
//! before the next command is read, so exactly one request is in flight at
//! any time.

use std::io::{self, BufRead, Write};

use inventory_app::{render, Pending, Session};
use inventory_core::{HttpMethod, HttpRequest, HttpResponse, ProductClient};
use tracing::{debug, info, warn};

/// The remote collection endpoint. Compiled in; there is no override.
const API_BASE_URL: &str = "http://127.0.0.1:3000";

fn main() -> io::Result<()> {
    setup_tracing();

    let client = ProductClient::new(API_BASE_URL);
    let mut session = Session::new(client);
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    info!(base_url = API_BASE_URL, "starting inventory session");

    // Initial load: the on-mount fetch.
    let pending = session.refresh();
    drive(&mut session, &agent, pending);

    println!("Product inventory. Type `help` for commands.");
    redraw(&session);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            redraw(&session);
            continue;
        }
        let (command, rest) = match line.split_once(' ') {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        match command {
            "help" => help(),
            "quit" | "exit" => break,
            "name" => session.input_name(rest),
            "price" => match rest.parse::<f64>() {
                Ok(price) => session.input_price(price),
                Err(_) => println!("price must be a number"),
            },
            "submit" => match session.submit() {
                Ok(Some(pending)) => drive(&mut session, &agent, pending),
                Ok(None) => println!("nothing submitted: name must be non-empty and price positive"),
                Err(err) => warn!(error = %err, "could not build request"),
            },
            "edit" => {
                if !session.edit(rest) {
                    println!("no product with id {rest}");
                }
            }
            "delete" => {
                if !session.request_delete(rest) {
                    println!("no product with id {rest}");
                }
            }
            "confirm" => match session.confirm_delete() {
                Some(pending) => drive(&mut session, &agent, pending),
                None => println!("no delete pending"),
            },
            "cancel" => session.cancel_delete(),
            "refresh" => {
                let pending = session.refresh();
                drive(&mut session, &agent, pending);
            }
            other => println!("unknown command: {other} (try `help`)"),
        }
        redraw(&session);
    }
    Ok(())
}

/// Run a pending request chain to completion. Transport failures and bad
/// responses reset the session's busy state instead of leaving it stuck.
fn drive(session: &mut Session, agent: &ureq::Agent, first: Pending) {
    let mut next = Some(first);
    while let Some(pending) = next.take() {
        debug!(
            method = pending.request.method.as_str(),
            path = %pending.request.path,
            "executing request"
        );
        match execute(agent, &pending.request) {
            Ok(response) => {
                debug!(status = response.status, "response received");
                match session.apply(pending.op, response) {
                    Ok(follow_up) => next = follow_up,
                    Err(err) => warn!(error = %err, "request failed"),
                }
            }
            Err(err) => {
                warn!(error = %err, "transport failure");
                session.interrupt(err.to_string());
            }
        }
    }
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// The agent is built with status-as-error disabled so 4xx/5xx responses are
/// returned as data and interpreted by the core client.
fn execute(agent: &ureq::Agent, req: &HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let mut response = match (req.method, req.body.as_deref()) {
        (HttpMethod::Get, _) => agent.get(&req.path).call()?,
        (HttpMethod::Delete, _) => agent.delete(&req.path).call()?,
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())?
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty()?,
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())?
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty()?,
    };
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}

fn redraw(session: &Session) {
    println!();
    print!("{}", render::table(session.products()));
    print!("{}", render::prompt(session));
    print!("> ");
    let _ = io::stdout().flush();
}

fn help() {
    println!("commands:");
    println!("  name <text>    set the form's name field");
    println!("  price <value>  set the form's price field");
    println!("  submit         create the draft, or save the product being edited");
    println!("  edit <id>      load a product into the edit form");
    println!("  delete <id>    ask to delete a product");
    println!("  confirm        confirm the pending delete");
    println!("  cancel         dismiss the pending delete");
    println!("  refresh        reload the list from the server");
    println!("  quit           exit");
}

fn setup_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}
