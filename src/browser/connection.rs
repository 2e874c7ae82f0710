use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::{AppError, AppResult};

/// 连接到已开启调试端口的浏览器，并找到测验页面
///
/// 指定了标题关键字时优先复用已打开的页面；找不到时新建页面并导航到 `target_url`。
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
    target_title: Option<&str>,
) -> AppResult<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}, 目标标题: {:?}", target_url, target_title);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                warn!("浏览器事件流中断");
                break;
            }
        }
    });

    // 等待浏览器同步已打开的页面
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(title) = target_title {
        for p in pages.iter() {
            if let Ok(Some(page_title)) = p.get_title().await {
                debug!("检查页面标题: {}", page_title);
                if page_title.contains(title) {
                    info!("✓ 找到测验页面: {}", page_title);
                    return Ok((browser, p.clone()));
                }
            }
        }
        debug!("未找到标题包含 '{}' 的页面，将创建新页面", title);
    }

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    if let Some(url) = target_url.filter(|u| *u != "about:blank") {
        page.goto(url).await.map_err(|e| {
            error!("导航到 {} 失败: {}", url, e);
            e
        })?;
        info!("已导航到: {}", url);
    }

    Ok((browser, page))
}
