pub mod mws_server;
