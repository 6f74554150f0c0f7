#[derive(Debug, Clone)]
pub struct CreateAccessToken;

#[derive(Debug, Clone)]
pub struct CreateOrder;

#[derive(Debug, Clone)]
pub struct Authorize;

#[derive(Debug, Clone)]
pub struct Capture;

#[derive(Debug, Clone)]
pub struct Void;

#[derive(Debug, Clone)]
pub struct Refund;

#[derive(Debug, Clone)]
pub struct Verify;

#[derive(Debug, Clone)]
pub struct Store;

#[derive(Debug, Clone)]
pub struct Unstore;
