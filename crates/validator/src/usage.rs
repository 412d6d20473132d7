//! Static setup instructions shown by `keyprobe --help`

/// Printed after the option list; performs no I/O
pub const USAGE: &str = "\
SETUP

1. Create Binance Spot Testnet keys
   - Open https://testnet.binance.vision/
   - Log in with GitHub
   - Choose \"Generate HMAC_SHA256 Key\", give it a label, and copy the
     API key and secret (the secret is shown only once)

2. Configure the environment (or a .env file next to the binary)
   USE_TESTNET=true
   BINANCE_API_KEY=<testnet api key>
   BINANCE_API_SECRET=<testnet api secret>

3. Run the check
   keyprobe
   keyprobe --env-file path/to/.env

4. Switch back to production
   USE_TESTNET=false
   BINANCE_API_KEY=<production api key>
   BINANCE_API_SECRET=<production api secret>
   Testnet keys are rejected by production and vice versa.

The exit code is 0 when the configuration validated and 1 otherwise.
Set RUST_LOG=debug for request-level logging.";
