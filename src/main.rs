#[tokio::main]
async fn main() {
    salon_admin_backend::run().await;
}
