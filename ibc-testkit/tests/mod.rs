mod handlers;
mod relayer;
