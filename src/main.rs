use anyhow::Result;
use quiz_lens::config::Config;
use quiz_lens::utils::logging;
use quiz_lens::App;

// 页面文档不能跨线程，主循环运行在单线程运行时上
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
