//! HTTP implementation of the comment service

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use threadline_core::prelude::*;
use threadline_core::{
    CommentRecord, CreateRequest, DeleteConfirmation, DestroyRequest, UpdateRequest,
};

use crate::service::{AntiForgery, CommentService};

/// Talks to the comment service over HTTP with form-encoded bodies
#[derive(Debug, Clone)]
pub struct HttpCommentService {
    client: Client,
    anti_forgery: Option<AntiForgery>,
}

impl HttpCommentService {
    pub fn new(timeout: Duration, anti_forgery: Option<AntiForgery>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("threadline/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            anti_forgery,
        })
    }

    fn protect(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.anti_forgery {
            Some(af) => builder.header(af.header.as_str(), af.token.as_str()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String> {
        let response = self
            .protect(builder)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(request_error)?;
        read_body(response).await
    }
}

async fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let response = response.error_for_status().map_err(request_error)?;
    let text = response.text().await.map_err(request_error)?;
    trace!("Service answered {} ({} bytes)", status, text.len());
    Ok(text)
}

fn request_error(err: reqwest::Error) -> Error {
    warn!("Comment request failed: {}", err);
    Error::request(err.to_string())
}

/// A body the service accepted but we cannot read is still a failed request
fn parse_record(text: &str) -> Result<CommentRecord> {
    CommentRecord::parse(text).map_err(|e| {
        warn!("Unreadable comment record: {}", e);
        Error::request(format!("unreadable response: {}", e))
    })
}

impl CommentService for HttpCommentService {
    async fn create(&self, request: &CreateRequest) -> Result<CommentRecord> {
        debug!("POST {}", request.url);
        let builder = self
            .client
            .post(request.url.clone())
            .form(&[("body", request.body.as_str())]);
        let text = self.send(builder).await?;
        parse_record(&text)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<CommentRecord> {
        debug!("PUT {}", request.url);
        let builder = self
            .client
            .put(request.url.clone())
            .form(&[("body", request.body.as_str())]);
        let text = self.send(builder).await?;
        let record = parse_record(&text)?;
        if record.id != request.id {
            return Err(Error::request(format!(
                "service answered for comment {} instead of {}",
                record.id, request.id
            )));
        }
        Ok(record)
    }

    async fn destroy(&self, request: &DestroyRequest) -> Result<DeleteConfirmation> {
        debug!("DELETE {}", request.url);
        let text = self.send(self.client.delete(request.url.clone())).await?;
        let confirmation = DeleteConfirmation::parse(&text)
            .map_err(|e| Error::request(format!("unreadable response: {}", e)))?;
        if !confirmation.is_deleted {
            return Err(Error::request("service did not confirm the deletion"));
        }
        Ok(confirmation)
    }
}
